// Time ranges and chunking
//
// All timestamps are UTC with millisecond precision. Ranges are half-open
// [start, end) and immutable: splitting or windowing derives new values.

use crate::{Error, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::fmt;

pub type Timestamp = DateTime<Utc>;

/// Parse an ISO-8601 timestamp (e.g. `2024-12-14T00:00:00.000Z`)
///
/// Any offset is normalized to UTC and sub-millisecond digits are dropped.
pub fn parse_timestamp(input: &str) -> Result<Timestamp> {
    let parsed = DateTime::parse_from_rfc3339(input.trim())
        .map_err(|e| Error::InvalidTimestamp(format!("'{}': {}", input, e)))?;
    let utc = parsed.with_timezone(&Utc);
    Ok(DateTime::<Utc>::from_timestamp_millis(utc.timestamp_millis()).unwrap_or(utc))
}

/// `ms` milliseconds as a duration; fails past chrono's representable range
pub fn duration_from_millis(ms: u64) -> Result<Duration> {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .ok_or_else(|| Error::InvalidDuration(format!("{} ms is out of range", ms)))
}

/// `secs` seconds as a duration; fails past chrono's representable range
pub fn duration_from_secs(secs: u64) -> Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| Error::InvalidDuration(format!("{} s is out of range", secs)))
}

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(format!(
                "start {} is after end {}",
                format_timestamp(&start),
                format_timestamp(&end)
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a range from two ISO-8601 strings
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of cursor increments needed to cover the range with `step`
    ///
    /// The cursor starts at `start` and one increment is issued per advance
    /// while the pre-advance cursor is still below `end`.
    pub fn increment_count(&self, step: Duration) -> Result<usize> {
        let step_ms = positive_millis(step, "step")?;
        let span_ms = self.duration().num_milliseconds();
        let whole = span_ms / step_ms;
        Ok((whole + i64::from(span_ms % step_ms != 0)) as usize)
    }

    /// Split into consecutive chunks of `cut_off`, last chunk truncated to `end`
    pub fn split(&self, cut_off: Duration) -> Result<Vec<Chunk>> {
        positive_millis(cut_off, "cut-off")?;

        let mut chunks = Vec::new();
        let mut current = self.start;
        while current < self.end {
            // Past the calendar limit the chunk simply runs to `end`
            let chunk_end = current
                .checked_add_signed(cut_off)
                .map_or(self.end, |next| next.min(self.end));
            chunks.push(Chunk {
                index: chunks.len(),
                range: TimeRange {
                    start: current,
                    end: chunk_end,
                },
            });
            current = chunk_end;
        }
        Ok(chunks)
    }

    /// `<start>-<end>` label used in output file names
    pub fn file_label(&self) -> String {
        format!(
            "{}-{}",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}

fn positive_millis(duration: Duration, what: &str) -> Result<i64> {
    let ms = duration.num_milliseconds();
    if ms <= 0 {
        return Err(Error::InvalidDuration(format!(
            "{} must be positive, got {} ms",
            what, ms
        )));
    }
    Ok(ms)
}

/// One bounded sub-range of an overall extraction window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub range: TimeRange,
}
