use crate::page::PageResult;
use crate::query::build_query;
use crate::transport::SearchTransport;
use crate::{Error, Result};
use beatdump_types::{RawRecord, TimeRange, Timestamp, format_timestamp};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// How the lower bound of each increment is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Every increment queries from the start of the whole range up to the
    /// cursor. Later increments repeat earlier records; nothing is deduplicated.
    #[default]
    Cumulative,
    /// Every increment queries from the previous cursor up to the current one.
    Sliding,
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPolicy::Cumulative => write!(f, "cumulative"),
            WindowPolicy::Sliding => write!(f, "sliding"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub step: Duration,
    /// Page size sent as `size`
    pub limit: u64,
    pub policy: WindowPolicy,
    /// Optional `query_string` term ANDed with the time filter
    pub filter: Option<String>,
}

impl FetchSettings {
    pub fn new(step: Duration, limit: u64) -> Self {
        Self {
            step,
            limit,
            policy: WindowPolicy::default(),
            filter: None,
        }
    }

    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.step <= Duration::zero() {
            return Err(Error::InvalidSettings(format!(
                "step must be positive, got {} ms",
                self.step.num_milliseconds()
            )));
        }
        if self.limit == 0 {
            return Err(Error::InvalidSettings(
                "limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bounds of one increment's query, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub index: usize,
    pub lower: Timestamp,
    pub upper: Timestamp,
}

impl fmt::Display for QueryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            format_timestamp(&self.lower),
            format_timestamp(&self.upper)
        )
    }
}

/// Lay out the increments a fetch over `range` will issue
///
/// The cursor starts at `range.start` and advances by `step`; an increment is
/// issued while the cursor is still below `range.end`. The upper bound is not
/// clamped to `range.end` unless stepping past it would leave chrono's
/// representable range, in which case the window stops at `range.end`.
pub fn plan_windows(range: &TimeRange, step: Duration, policy: WindowPolicy) -> Windows {
    Windows {
        start: range.start(),
        end: range.end(),
        cursor: range.start(),
        step,
        policy,
        index: 0,
    }
}

/// Lazy sequence of [`QueryWindow`]s, see [`plan_windows`]
#[derive(Debug, Clone)]
pub struct Windows {
    start: Timestamp,
    end: Timestamp,
    cursor: Timestamp,
    step: Duration,
    policy: WindowPolicy,
    index: usize,
}

impl Iterator for Windows {
    type Item = QueryWindow;

    fn next(&mut self) -> Option<QueryWindow> {
        if self.cursor >= self.end || self.step <= Duration::zero() {
            return None;
        }

        let upper = self
            .cursor
            .checked_add_signed(self.step)
            .unwrap_or(self.end);
        let lower = match self.policy {
            WindowPolicy::Cumulative => self.start,
            WindowPolicy::Sliding => self.cursor,
        };
        let window = QueryWindow {
            index: self.index,
            lower,
            upper,
        };

        self.index += 1;
        self.cursor = upper;
        Some(window)
    }
}

/// Why an increment contributed no records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Backend answered with a non-success HTTP status
    Status(u16),
    /// Request never produced a reply
    Transport { kind: &'static str, message: String },
    /// Reply body was not a search result
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Status(code) => write!(f, "HTTP status {}", code),
            SkipReason::Transport { kind, message } => write!(f, "{}: {}", kind, message),
            SkipReason::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrementOutcome {
    Accepted {
        returned: usize,
        reported_total: u64,
        /// Matches left behind because the page was full
        dropped: u64,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementReport {
    pub window: QueryWindow,
    pub outcome: IncrementOutcome,
}

impl IncrementReport {
    pub fn is_truncated(&self) -> bool {
        matches!(self.outcome, IncrementOutcome::Accepted { dropped, .. } if dropped > 0)
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.outcome {
            IncrementOutcome::Skipped(reason) => Some(reason),
            IncrementOutcome::Accepted { .. } => None,
        }
    }
}

/// Records of one fetch, in query order, plus per-increment outcomes
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub records: Vec<RawRecord>,
    pub increments: Vec<IncrementReport>,
}

impl FetchReport {
    pub fn truncated_increments(&self) -> usize {
        self.increments.iter().filter(|i| i.is_truncated()).count()
    }

    pub fn skipped_increments(&self) -> usize {
        self.increments
            .iter()
            .filter(|i| i.skip_reason().is_some())
            .count()
    }

    /// Sum of matches reported beyond the page limit across increments
    pub fn dropped_estimate(&self) -> u64 {
        self.increments
            .iter()
            .map(|i| match i.outcome {
                IncrementOutcome::Accepted { dropped, .. } => dropped,
                IncrementOutcome::Skipped(_) => 0,
            })
            .sum()
    }
}

pub struct WindowedFetcher<T> {
    transport: T,
    settings: FetchSettings,
}

impl<T: SearchTransport> WindowedFetcher<T> {
    pub fn new(transport: T, settings: FetchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            transport,
            settings,
        })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn plan(&self, range: &TimeRange) -> Windows {
        plan_windows(range, self.settings.step, self.settings.policy)
    }

    pub fn fetch(&self, range: &TimeRange) -> FetchReport {
        self.fetch_with(range, |_| {})
    }

    pub fn fetch_records(&self, range: &TimeRange) -> Vec<RawRecord> {
        self.fetch(range).records
    }

    /// Fetch every increment of `range`, calling `on_increment` after each one
    pub fn fetch_with<F>(&self, range: &TimeRange, mut on_increment: F) -> FetchReport
    where
        F: FnMut(&IncrementReport),
    {
        let mut report = FetchReport::default();

        for window in self.plan(range) {
            let body = build_query(&window, self.settings.limit, self.settings.filter.as_deref());
            debug!(increment = window.index, window = %window, "issuing search");

            let outcome = match self.run_increment(&body) {
                Ok(page) => {
                    if page.is_truncated() {
                        warn!(
                            window = %window,
                            reported_total = page.reported_total,
                            limit = page.requested_limit,
                            "Missed {} records: page limit reached",
                            page.dropped()
                        );
                    }
                    let outcome = IncrementOutcome::Accepted {
                        returned: page.records.len(),
                        reported_total: page.reported_total,
                        dropped: page.dropped(),
                    };
                    report.records.extend(page.records);
                    outcome
                }
                Err(reason) => {
                    warn!(window = %window, reason = %reason, "skipping increment");
                    IncrementOutcome::Skipped(reason)
                }
            };

            let increment = IncrementReport { window, outcome };
            on_increment(&increment);
            report.increments.push(increment);
        }

        report
    }

    fn run_increment(&self, body: &serde_json::Value) -> std::result::Result<PageResult, SkipReason> {
        let reply = self
            .transport
            .search(body)
            .map_err(|e| SkipReason::Transport {
                kind: e.kind(),
                message: e.message().to_string(),
            })?;

        if !reply.is_success() {
            return Err(SkipReason::Status(reply.status));
        }

        PageResult::parse(&reply.body, self.settings.limit)
            .map_err(|e| SkipReason::Malformed(e.to_string()))
    }
}
