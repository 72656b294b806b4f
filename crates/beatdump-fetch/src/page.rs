use crate::{Error, Result};
use beatdump_types::RawRecord;
use serde_json::Value;

/// One page of hits returned for one increment
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub records: Vec<RawRecord>,
    pub reported_total: u64,
    pub requested_limit: u64,
}

impl PageResult {
    /// Parse a `_search` response body
    ///
    /// `hits.total` may be `{ "value": n }` or a bare number; when absent the
    /// page length stands in for it.
    pub fn parse(body: &str, requested_limit: u64) -> Result<Self> {
        let document: Value = serde_json::from_str(body)
            .map_err(|e| Error::Malformed(format!("body is not JSON: {}", e)))?;

        let hits = document
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Malformed("missing 'hits.hits' array".to_string()))?;

        let records: Vec<RawRecord> = hits.iter().cloned().map(RawRecord::new).collect();

        let reported_total = match document.pointer("/hits/total") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(total) => total.get("value").and_then(Value::as_u64),
            None => None,
        }
        .unwrap_or(records.len() as u64);

        Ok(Self {
            records,
            reported_total,
            requested_limit,
        })
    }

    /// `requested_limit - reported_total`; negative when the page was truncated
    pub fn miss_count(&self) -> i64 {
        self.requested_limit as i64 - self.reported_total as i64
    }

    pub fn is_truncated(&self) -> bool {
        self.miss_count() < 0
    }

    /// Matches the backend held beyond what the page could return
    pub fn dropped(&self) -> u64 {
        self.reported_total.saturating_sub(self.requested_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(total: Value, hits: Vec<Value>) -> String {
        json!({"took": 3, "hits": {"total": total, "hits": hits}}).to_string()
    }

    #[test]
    fn test_page_within_limit() {
        let page = PageResult::parse(&body(json!({"value": 2}), vec![json!({}), json!({})]), 10)
            .unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.miss_count(), 8);
        assert!(!page.is_truncated());
        assert_eq!(page.dropped(), 0);
    }

    #[test]
    fn test_page_truncated() {
        let hits = vec![json!({}); 10];
        let page = PageResult::parse(&body(json!({"value": 25}), hits), 10).unwrap();
        assert_eq!(page.miss_count(), -15);
        assert!(page.is_truncated());
        assert_eq!(page.dropped(), 15);
        assert_eq!(page.records.len(), 10);
    }

    #[test]
    fn test_page_total_as_bare_number() {
        let page = PageResult::parse(&body(json!(4), vec![json!({})]), 10).unwrap();
        assert_eq!(page.reported_total, 4);
    }

    #[test]
    fn test_page_total_missing_falls_back_to_length() {
        let raw = json!({"hits": {"hits": [{}, {}, {}]}}).to_string();
        let page = PageResult::parse(&raw, 10).unwrap();
        assert_eq!(page.reported_total, 3);
    }

    #[test]
    fn test_page_rejects_non_json_and_missing_hits() {
        assert!(matches!(
            PageResult::parse("<html>bad gateway</html>", 10),
            Err(Error::Malformed(_))
        ));
        assert!(matches!(
            PageResult::parse(r#"{"error": "index_not_found"}"#, 10),
            Err(Error::Malformed(_))
        ));
    }
}
