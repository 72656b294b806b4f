// In-memory search transport
//
// Replies are consumed in order; once the script runs dry every further
// request gets an empty page. Every request body is recorded.

use crate::fixtures::page_body;
use beatdump_fetch::query::range_bounds;
use beatdump_fetch::{HttpReply, SearchTransport, TransportError};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

type Scripted = std::result::Result<HttpReply, TransportError>;

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    queries: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful page with `hits` and a reported total
    pub fn reply_page(self, hits: Vec<Value>, total: u64) -> Self {
        self.push(Ok(HttpReply {
            status: 200,
            body: page_body(hits, total),
        }))
    }

    pub fn reply_status(self, status: u16) -> Self {
        self.push(Ok(HttpReply {
            status,
            body: json!({"error": {"type": "scripted"}, "status": status}).to_string(),
        }))
    }

    pub fn reply_raw(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(HttpReply {
            status,
            body: body.into(),
        }))
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.push(Err(error))
    }

    fn push(self, reply: Scripted) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
        self
    }

    pub fn queries(&self) -> Vec<Value> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// `(gte, lte)` of every recorded query, in order
    pub fn query_bounds(&self) -> Vec<(String, String)> {
        self.queries().iter().filter_map(range_bounds).collect()
    }
}

impl SearchTransport for ScriptedTransport {
    fn search(&self, body: &Value) -> std::result::Result<HttpReply, TransportError> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(body.clone());

        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HttpReply {
                    status: 200,
                    body: page_body(Vec::new(), 0),
                })
            })
    }
}
