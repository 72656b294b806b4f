use crate::line;
use beatdump_types::{Category, RawRecord};
use std::fmt;

/// Why a record produced no output
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Omission {
    /// Category marker present but not one of metrics/logs/traces
    UnknownCategory(String),
    /// No category marker at all
    MissingCategory,
}

impl fmt::Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Omission::UnknownCategory(marker) => write!(f, "unknown category '{}'", marker),
            Omission::MissingCategory => write!(f, "missing category"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Line(String),
    Omitted(Omission),
}

impl Classification {
    pub fn line(&self) -> Option<&str> {
        match self {
            Classification::Line(line) => Some(line),
            Classification::Omitted(_) => None,
        }
    }
}

/// Categories that have a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Metrics,
    Logs,
    Traces,
}

/// Category gate shared by line and row projections
pub(crate) fn kind_of(record: &RawRecord) -> Result<Kind, Omission> {
    match record.category() {
        Category::Metrics => Ok(Kind::Metrics),
        Category::Logs => Ok(Kind::Logs),
        Category::Traces => Ok(Kind::Traces),
        Category::Unknown(marker) => Err(Omission::UnknownCategory(marker)),
        Category::Missing => Err(Omission::MissingCategory),
    }
}

/// Map one raw record to its formatted line
pub fn classify(record: &RawRecord) -> Classification {
    let rendered = match kind_of(record) {
        Ok(Kind::Metrics) => line::metrics(record),
        Ok(Kind::Logs) => line::logs(record),
        Ok(Kind::Traces) => line::traces(record),
        Err(reason) => return Classification::Omitted(reason),
    };
    Classification::Line(line::single_line(&rendered))
}
