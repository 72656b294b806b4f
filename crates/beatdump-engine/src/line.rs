// One-line renderings per category
//
// Every line starts with `[timestamp] | HOST: name` and uses ` | ` between
// sections.

use crate::fields::{count_text, first_of, first_value, number, text};
use beatdump_types::RawRecord;

const MIB: f64 = 1024.0 * 1024.0;

const CPU_FIELDS: &[(&str, &str)] = &[
    ("system", "system.cpu.usage"),
    ("process", "process.cpu.usage"),
    ("count", "system.cpu.count"),
    ("load_1m", "process.runtime.jvm.system.cpu.load_1m"),
    ("jvm_utilization", "process.runtime.jvm.cpu.utilization"),
    ("jvm_system_utilization", "process.runtime.jvm.system.cpu.utilization"),
];

const MEMORY_FIELDS: &[(&str, &str)] = &[
    ("jvm_committed", "jvm.memory.committed"),
    ("jvm_max", "jvm.memory.max"),
    ("jvm_used", "jvm.memory.used"),
    ("buffer_used", "jvm.buffer.memory.used"),
    ("usage_after_gc", "jvm.memory.usage.after.gc"),
    ("gc_allocated", "jvm.gc.memory.allocated"),
    ("gc_promoted", "jvm.gc.memory.promoted"),
    ("runtime_init", "process.runtime.jvm.memory.init"),
    ("runtime_limit", "process.runtime.jvm.memory.limit"),
    ("runtime_usage", "process.runtime.jvm.memory.usage"),
    ("runtime_committed", "process.runtime.jvm.memory.committed"),
    (
        "runtime_usage_after_last_gc",
        "process.runtime.jvm.memory.usage_after_last_gc",
    ),
    ("system_utilization", "system.memory.utilization"),
    ("system_usage", "system.memory.usage"),
];

/// Escape line breaks so one record always maps to one output line
pub(crate) fn single_line(rendered: &str) -> String {
    rendered
        .replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

fn header(record: &RawRecord) -> String {
    format!(
        "[{}] | HOST: {}",
        text(record, "@timestamp"),
        text(record, "host.name")
    )
}

fn key_values(record: &RawRecord, fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(label, path)| format!("{}={}", label, text(record, path)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn megabytes(record: &RawRecord, path: &str) -> f64 {
    number(record, path).unwrap_or(0.0) / MIB
}

pub(crate) fn metrics(record: &RawRecord) -> String {
    let latency = first_value(record, "transaction.duration.histogram.values")
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "{} | CPU: {} | MEMORY: {} | NETWORK ({}): IN: {:.2} MB, OUT: {:.2} MB | TRANSACTION: latency={}, result={}, requests={}",
        header(record),
        key_values(record, CPU_FIELDS),
        key_values(record, MEMORY_FIELDS),
        text(record, "system.network.name"),
        megabytes(record, "system.network.in.bytes"),
        megabytes(record, "system.network.out.bytes"),
        latency,
        text(record, "transaction.result"),
        count_text(record, "_doc_count"),
    )
}

pub(crate) fn logs(record: &RawRecord) -> String {
    let error_code =
        first_of(record, "error.exception", "type").unwrap_or_else(|| "N/A".to_string());
    let error_cause =
        first_of(record, "error.exception", "message").unwrap_or_else(|| "N/A".to_string());

    format!(
        "{} | message: {} | error_code: {} | error_cause: {}",
        header(record),
        text(record, "message"),
        error_code,
        error_cause,
    )
}

/// `transaction.duration.us` converted to seconds
pub(crate) fn transaction_seconds(record: &RawRecord) -> f64 {
    number(record, "transaction.duration.us").unwrap_or(0.0) / 1_000_000.0
}

pub(crate) fn traces(record: &RawRecord) -> String {
    format!(
        "{} | transaction_name: {} | transaction_duration: {} | transaction_id: {} | transaction_type: {} | span_name: {} | span_duration: {} | span_subtype: {} | span_type: {} | span_id: {}",
        header(record),
        text(record, "transaction.name"),
        transaction_seconds(record),
        text(record, "transaction.id"),
        text(record, "transaction.type"),
        text(record, "span.name"),
        count_text(record, "span.duration.us"),
        text(record, "span.subtype"),
        text(record, "span.type"),
        text(record, "span.id"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_line_contains_exception_fields() {
        let record = RawRecord::new(json!({
            "_source": {
                "@timestamp": "T",
                "data_stream.type": "logs",
                "message": "m",
                "error": {"exception": [{"type": "E", "message": "M"}]}
            }
        }));
        insta::assert_snapshot!(logs(&record), @"[T] | HOST: N/A | message: m | error_code: E | error_cause: M");
    }

    #[test]
    fn test_log_line_defaults() {
        let record = RawRecord::new(json!({"_source": {"data_stream.type": "logs"}}));
        insta::assert_snapshot!(logs(&record), @"[N/A] | HOST: N/A | message: N/A | error_code: N/A | error_cause: N/A");
    }

    #[test]
    fn test_trace_line_converts_transaction_duration() {
        let record = RawRecord::new(json!({
            "_source": {
                "@timestamp": "2024-12-14T00:00:00.000Z",
                "host": {"name": "api-1"},
                "data_stream.type": "traces",
                "transaction": {
                    "name": "GET /orders",
                    "duration": {"us": 1500000},
                    "id": "tx1",
                    "type": "request"
                },
                "span": {
                    "name": "SELECT",
                    "duration": {"us": 320},
                    "subtype": "postgresql",
                    "id": "sp1",
                    "type": "db"
                }
            }
        }));
        insta::assert_snapshot!(traces(&record), @"[2024-12-14T00:00:00.000Z] | HOST: api-1 | transaction_name: GET /orders | transaction_duration: 1.5 | transaction_id: tx1 | transaction_type: request | span_name: SELECT | span_duration: 320 | span_subtype: postgresql | span_type: db | span_id: sp1");
    }

    #[test]
    fn test_trace_line_missing_durations_default_to_zero() {
        let record = RawRecord::new(json!({"_source": {"data_stream.type": "traces"}}));
        let line = traces(&record);
        assert!(line.contains("transaction_duration: 0 |"));
        assert!(line.contains("span_duration: 0 |"));
    }

    #[test]
    fn test_metrics_line_reads_flat_and_nested_fields() {
        let record = RawRecord::new(json!({
            "_source": {
                "@timestamp": "2024-12-14T00:00:00.000Z",
                "host": {"name": "node-7"},
                "data_stream.type": "metrics",
                "system.cpu.usage": 0.42,
                "system.cpu.count": 8,
                "process.runtime.jvm": {"system.cpu.load_1m": 1.25},
                "jvm.memory": {"used": 1024},
                "system": {"network": {"name": "eth0", "in": {"bytes": 2097152}, "out": {"bytes": 1048576}}},
                "transaction": {"duration.histogram": {"values": [12.5, 40.0]}, "result": "HTTP 2xx"},
                "_doc_count": 17
            }
        }));
        let line = metrics(&record);

        assert!(line.starts_with("[2024-12-14T00:00:00.000Z] | HOST: node-7 | CPU: system=0.42,"));
        assert!(line.contains("count=8"));
        assert!(line.contains("load_1m=1.25"));
        assert!(line.contains("process=N/A"));
        assert!(line.contains("jvm_used=1024"));
        assert!(line.contains("NETWORK (eth0): IN: 2.00 MB, OUT: 1.00 MB"));
        assert!(line.ends_with("TRANSACTION: latency=12.5, result=HTTP 2xx, requests=17"));
    }
}
