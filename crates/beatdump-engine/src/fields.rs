// Field narrowing with defaults
//
// Absent or null fields never fail; they fall back to a sentinel.

use beatdump_types::RawRecord;
use serde_json::Value;

pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// Render a JSON scalar without quotes
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn opt_text(record: &RawRecord, path: &str) -> Option<String> {
    record.field(path).and_then(render)
}

/// Field as text, `N/A` when absent
pub(crate) fn text(record: &RawRecord, path: &str) -> String {
    opt_text(record, path).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub(crate) fn number(record: &RawRecord, path: &str) -> Option<f64> {
    record.field(path).and_then(Value::as_f64)
}

/// Numeric field rendered as-is, `0` when absent or not numeric
pub(crate) fn count_text(record: &RawRecord, path: &str) -> String {
    match record.field(path) {
        Some(value @ Value::Number(_)) => value.to_string(),
        _ => "0".to_string(),
    }
}

/// Entry `key` of the first element of the array at `path`
pub(crate) fn first_of(record: &RawRecord, path: &str, key: &str) -> Option<String> {
    record
        .field(path)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get(key))
        .and_then(render)
}

/// First value of a histogram-like array at `path`
pub(crate) fn first_value(record: &RawRecord, path: &str) -> Option<String> {
    record
        .field(path)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(render)
}
