use crate::{Error, Result};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection parameters for the search backend
///
/// Immutable once built; the fetcher never mutates it between increments.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Full `_search` URL including the index pattern
    pub url: String,
    /// Pre-obtained API key, sent as `Authorization: ApiKey <key>`
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Monitoring clusters commonly run with self-signed certificates
    pub accept_invalid_certs: bool,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: true,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Raw reply to one search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level fault for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Timeout(String),
    Connect(String),
    Request(String),
    Body(String),
}

impl TransportError {
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "timeout",
            TransportError::Connect(_) => "connect",
            TransportError::Request(_) => "request",
            TransportError::Body(_) => "body",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TransportError::Timeout(msg)
            | TransportError::Connect(msg)
            | TransportError::Request(msg)
            | TransportError::Body(msg) => msg,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind(), self.message())
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout(message)
        } else if err.is_connect() {
            TransportError::Connect(message)
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(message)
        } else {
            TransportError::Request(message)
        }
    }
}

/// Issues one search request and returns the unparsed reply
pub trait SearchTransport {
    fn search(&self, body: &Value) -> std::result::Result<HttpReply, TransportError>;
}

impl<T: SearchTransport + ?Sized> SearchTransport for &T {
    fn search(&self, body: &Value) -> std::result::Result<HttpReply, TransportError> {
        (**self).search(body)
    }
}

impl<T: SearchTransport + ?Sized> SearchTransport for Box<T> {
    fn search(&self, body: &Value) -> std::result::Result<HttpReply, TransportError> {
        (**self).search(body)
    }
}

/// Blocking HTTP transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("beatdump/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Client(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl SearchTransport for HttpTransport {
    // The search API accepts a JSON body on GET
    fn search(&self, body: &Value) -> std::result::Result<HttpReply, TransportError> {
        let mut request = self.client.get(&self.url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("ApiKey {key}"));
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpReply { status, body })
    }
}
