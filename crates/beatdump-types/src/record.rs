// Raw search hits
//
// A hit is kept as an untyped JSON tree. Nothing is validated on receipt;
// fields are narrowed only where they are read, with defaults on absence.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

static NULL: Value = Value::Null;

/// Field carrying the record category on every `_source`
pub const CATEGORY_FIELD: &str = "data_stream.type";

/// One document returned by the backend (`{_index, _id, _source, ...}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `_source` document, or `null` when the hit carries none
    pub fn source(&self) -> &Value {
        self.0.get("_source").unwrap_or(&NULL)
    }

    /// Resolve a dotted field path inside `_source`
    pub fn field(&self, path: &str) -> Option<&Value> {
        lookup(self.source(), path)
    }

    pub fn category(&self) -> Category {
        match self.field(CATEGORY_FIELD) {
            None | Some(Value::Null) => Category::Missing,
            Some(Value::String(marker)) => Category::from_marker(marker),
            Some(other) => Category::Unknown(other.to_string()),
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Resolve `path` against `value`, accepting both flattened and nested keys
///
/// Beats documents mix literal dotted keys (`"system.cpu.usage": 0.4`) with
/// nested objects (`{"system": {"cpu": {...}}}`), sometimes in one document.
/// At each level the whole remaining path is tried as a literal key first,
/// then the longest matching prefix is descended into.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let object = value.as_object()?;
    if let Some(found) = object.get(path) {
        return Some(found);
    }
    path.rmatch_indices('.').find_map(|(dot, _)| {
        object
            .get(&path[..dot])
            .and_then(|child| lookup(child, &path[dot + 1..]))
    })
}

/// Category discriminator of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Metrics,
    Logs,
    Traces,
    Unknown(String),
    Missing,
}

impl Category {
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            "metrics" => Category::Metrics,
            "logs" => Category::Logs,
            "traces" => Category::Traces,
            other => Category::Unknown(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Category::Metrics | Category::Logs | Category::Traces)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Metrics => write!(f, "metrics"),
            Category::Logs => write!(f, "logs"),
            Category::Traces => write!(f, "traces"),
            Category::Unknown(marker) => write!(f, "unknown({})", marker),
            Category::Missing => write!(f, "missing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_literal_dotted_key() {
        let doc = json!({"system.cpu.usage": 0.25});
        assert_eq!(lookup(&doc, "system.cpu.usage"), Some(&json!(0.25)));
    }

    #[test]
    fn test_lookup_nested_path() {
        let doc = json!({"system": {"cpu": {"usage": 0.5}}});
        assert_eq!(lookup(&doc, "system.cpu.usage"), Some(&json!(0.5)));
    }

    #[test]
    fn test_lookup_mixed_path() {
        let doc = json!({"process.runtime.jvm": {"system.cpu.load_1m": 1.5}});
        assert_eq!(
            lookup(&doc, "process.runtime.jvm.system.cpu.load_1m"),
            Some(&json!(1.5))
        );
    }

    #[test]
    fn test_lookup_missing() {
        let doc = json!({"system": {"cpu": 3}});
        assert_eq!(lookup(&doc, "system.cpu.usage"), None);
        assert_eq!(lookup(&json!("scalar"), "a"), None);
    }

    #[test]
    fn test_category_from_flat_and_nested_marker() {
        let flat = RawRecord::new(json!({"_source": {"data_stream.type": "logs"}}));
        let nested = RawRecord::new(json!({"_source": {"data_stream": {"type": "traces"}}}));
        assert_eq!(flat.category(), Category::Logs);
        assert_eq!(nested.category(), Category::Traces);
    }

    #[test]
    fn test_category_unknown_and_missing() {
        let unknown = RawRecord::new(json!({"_source": {"data_stream.type": "unknown"}}));
        let missing = RawRecord::new(json!({"_id": "x"}));
        assert_eq!(unknown.category(), Category::Unknown("unknown".to_string()));
        assert!(!unknown.category().is_known());
        assert_eq!(missing.category(), Category::Missing);
    }
}
