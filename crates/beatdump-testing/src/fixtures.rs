use serde_json::{Value, json};

/// Render a `_search` response body
pub fn page_body(hits: Vec<Value>, total: u64) -> String {
    json!({
        "took": 1,
        "timed_out": false,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "hits": hits
        }
    })
    .to_string()
}

/// One search hit with the fields every category line reads
pub fn hit(category: &str, timestamp: &str, message: &str) -> Value {
    json!({
        "_index": "metricbeat-8.15",
        "_id": message,
        "_source": {
            "@timestamp": timestamp,
            "data_stream.type": category,
            "host": {"name": "node-1"},
            "message": message
        }
    })
}
