// Tabular projections, one row type per category
//
// Column names are the CSV headers. Absent gauges serialize as empty cells.

use crate::classify::{Kind, Omission, kind_of};
use crate::fields::{count_text, first_of, first_value, opt_text};
use beatdump_types::{Category, RawRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "System CPU Usage")]
    pub system_cpu_usage: Option<String>,
    #[serde(rename = "Process CPU Usage")]
    pub process_cpu_usage: Option<String>,
    #[serde(rename = "System CPU Count")]
    pub system_cpu_count: Option<String>,
    #[serde(rename = "jvm_system_cpu_load_1m")]
    pub jvm_system_cpu_load_1m: Option<String>,
    #[serde(rename = "jvm_cpu_utilization")]
    pub jvm_cpu_utilization: Option<String>,
    #[serde(rename = "jvm_system_cpu_utilization")]
    pub jvm_system_cpu_utilization: Option<String>,
    #[serde(rename = "jvm.memory.committed")]
    pub jvm_memory_committed: Option<String>,
    #[serde(rename = "jvm.memory.max")]
    pub jvm_memory_max: Option<String>,
    #[serde(rename = "jvm.memory.used")]
    pub jvm_memory_used: Option<String>,
    #[serde(rename = "jvm.buffer.memory.used")]
    pub jvm_buffer_memory_used: Option<String>,
    #[serde(rename = "jvm.memory.usage.after.gc")]
    pub jvm_memory_usage_after_gc: Option<String>,
    #[serde(rename = "jvm.gc.memory.allocated")]
    pub jvm_gc_memory_allocated: Option<String>,
    #[serde(rename = "jvm.gc.memory.promoted")]
    pub jvm_gc_memory_promoted: Option<String>,
    #[serde(rename = "process.runtime.jvm.memory.init")]
    pub runtime_memory_init: Option<String>,
    #[serde(rename = "process.runtime.jvm.memory.limit")]
    pub runtime_memory_limit: Option<String>,
    #[serde(rename = "process.runtime.jvm.memory.usage")]
    pub runtime_memory_usage: Option<String>,
    #[serde(rename = "process.runtime.jvm.memory.committed")]
    pub runtime_memory_committed: Option<String>,
    #[serde(rename = "process.runtime.jvm.memory.usage_after_last_gc")]
    pub runtime_memory_usage_after_last_gc: Option<String>,
    #[serde(rename = "system.memory.utilization")]
    pub system_memory_utilization: Option<String>,
    #[serde(rename = "system.memory.usage")]
    pub system_memory_usage: Option<String>,
    #[serde(rename = "Latency")]
    pub latency: Option<String>,
    #[serde(rename = "Error Rate")]
    pub error_rate: Option<String>,
    #[serde(rename = "Number of Requests")]
    pub number_of_requests: String,
}

impl MetricRow {
    /// CSV header, in field order
    pub const COLUMNS: &'static [&'static str] = &[
        "Timestamp",
        "System CPU Usage",
        "Process CPU Usage",
        "System CPU Count",
        "jvm_system_cpu_load_1m",
        "jvm_cpu_utilization",
        "jvm_system_cpu_utilization",
        "jvm.memory.committed",
        "jvm.memory.max",
        "jvm.memory.used",
        "jvm.buffer.memory.used",
        "jvm.memory.usage.after.gc",
        "jvm.gc.memory.allocated",
        "jvm.gc.memory.promoted",
        "process.runtime.jvm.memory.init",
        "process.runtime.jvm.memory.limit",
        "process.runtime.jvm.memory.usage",
        "process.runtime.jvm.memory.committed",
        "process.runtime.jvm.memory.usage_after_last_gc",
        "system.memory.utilization",
        "system.memory.usage",
        "Latency",
        "Error Rate",
        "Number of Requests",
    ];

    pub fn from_record(record: &RawRecord) -> Self {
        let field = |path: &str| opt_text(record, path);
        Self {
            timestamp: field("@timestamp"),
            system_cpu_usage: field("system.cpu.usage"),
            process_cpu_usage: field("process.cpu.usage"),
            system_cpu_count: field("system.cpu.count"),
            jvm_system_cpu_load_1m: field("process.runtime.jvm.system.cpu.load_1m"),
            jvm_cpu_utilization: field("process.runtime.jvm.cpu.utilization"),
            jvm_system_cpu_utilization: field("process.runtime.jvm.system.cpu.utilization"),
            jvm_memory_committed: field("jvm.memory.committed"),
            jvm_memory_max: field("jvm.memory.max"),
            jvm_memory_used: field("jvm.memory.used"),
            jvm_buffer_memory_used: field("jvm.buffer.memory.used"),
            jvm_memory_usage_after_gc: field("jvm.memory.usage.after.gc"),
            jvm_gc_memory_allocated: field("jvm.gc.memory.allocated"),
            jvm_gc_memory_promoted: field("jvm.gc.memory.promoted"),
            runtime_memory_init: field("process.runtime.jvm.memory.init"),
            runtime_memory_limit: field("process.runtime.jvm.memory.limit"),
            runtime_memory_usage: field("process.runtime.jvm.memory.usage"),
            runtime_memory_committed: field("process.runtime.jvm.memory.committed"),
            runtime_memory_usage_after_last_gc: field(
                "process.runtime.jvm.memory.usage_after_last_gc",
            ),
            system_memory_utilization: field("system.memory.utilization"),
            system_memory_usage: field("system.memory.usage"),
            latency: first_value(record, "transaction.duration.histogram.values"),
            error_rate: field("transaction.result"),
            number_of_requests: count_text(record, "_doc_count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
    #[serde(rename = "Error code")]
    pub error_code: Option<String>,
    #[serde(rename = "Error cause")]
    pub error_cause: Option<String>,
}

impl LogRow {
    pub const COLUMNS: &'static [&'static str] =
        &["Timestamp", "Message", "Error code", "Error cause"];

    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            timestamp: opt_text(record, "@timestamp"),
            message: opt_text(record, "message"),
            error_code: first_of(record, "error.exception", "type"),
            error_cause: first_of(record, "error.exception", "message"),
        }
    }
}

/// Durations stay in microseconds here
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    pub transaction_name: Option<String>,
    pub transaction_duration: String,
    pub transaction_id: Option<String>,
    pub transaction_type: Option<String>,
    pub span_name: Option<String>,
    pub span_duration: String,
    pub span_subtype: Option<String>,
    pub span_id: Option<String>,
    pub span_type: Option<String>,
}

impl TraceRow {
    pub const COLUMNS: &'static [&'static str] = &[
        "Timestamp",
        "transaction_name",
        "transaction_duration",
        "transaction_id",
        "transaction_type",
        "span_name",
        "span_duration",
        "span_subtype",
        "span_id",
        "span_type",
    ];

    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            timestamp: opt_text(record, "@timestamp"),
            transaction_name: opt_text(record, "transaction.name"),
            transaction_duration: count_text(record, "transaction.duration.us"),
            transaction_id: opt_text(record, "transaction.id"),
            transaction_type: opt_text(record, "transaction.type"),
            span_name: opt_text(record, "span.name"),
            span_duration: count_text(record, "span.duration.us"),
            span_subtype: opt_text(record, "span.subtype"),
            span_id: opt_text(record, "span.id"),
            span_type: opt_text(record, "span.type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Metric(MetricRow),
    Log(LogRow),
    Trace(TraceRow),
}

impl Row {
    pub fn category(&self) -> Category {
        match self {
            Row::Metric(_) => Category::Metrics,
            Row::Log(_) => Category::Logs,
            Row::Trace(_) => Category::Traces,
        }
    }
}

/// Map one raw record to its category's row
pub fn project(record: &RawRecord) -> Result<Row, Omission> {
    Ok(match kind_of(record)? {
        Kind::Metrics => Row::Metric(MetricRow::from_record(record)),
        Kind::Logs => Row::Log(LogRow::from_record(record)),
        Kind::Traces => Row::Trace(TraceRow::from_record(record)),
    })
}
