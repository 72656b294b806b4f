// Engine module - record classification and normalization
// Sits between raw search hits (types) and the file sinks (runtime).
// Everything here is pure: no I/O, no logging, no state.

mod fields;
pub mod classify;
pub mod line;
pub mod row;

pub use classify::{Classification, Omission, classify};
pub use row::{LogRow, MetricRow, Row, TraceRow, project};

use beatdump_types::RawRecord;

/// Formatted lines of a batch plus what was left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub lines: Vec<String>,
    pub omitted: Vec<Omission>,
}

/// Per-category rows of a batch; categories keep their own columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub metrics: Vec<MetricRow>,
    pub logs: Vec<LogRow>,
    pub traces: Vec<TraceRow>,
    pub omitted: Vec<Omission>,
}

impl Tables {
    pub fn row_count(&self) -> usize {
        self.metrics.len() + self.logs.len() + self.traces.len()
    }
}

/// Classify every record into a line, preserving input order
pub fn normalize(records: &[RawRecord]) -> Normalized {
    let mut out = Normalized::default();
    for record in records {
        match classify(record) {
            Classification::Line(line) => out.lines.push(line),
            Classification::Omitted(reason) => out.omitted.push(reason),
        }
    }
    out
}

/// Project every record into its category's row type
pub fn tabulate(records: &[RawRecord]) -> Tables {
    let mut out = Tables::default();
    for record in records {
        match project(record) {
            Ok(Row::Metric(row)) => out.metrics.push(row),
            Ok(Row::Log(row)) => out.logs.push(row),
            Ok(Row::Trace(row)) => out.traces.push(row),
            Err(reason) => out.omitted.push(reason),
        }
    }
    out
}
