use crate::fetcher::QueryWindow;
use beatdump_types::format_timestamp;
use serde_json::{Value, json};

/// Build the search body for one increment
///
/// Both bounds are inclusive (`gte`/`lte`), the page always starts at 0 and
/// hits are sorted ascending by `@timestamp`.
pub fn build_query(window: &QueryWindow, limit: u64, filter: Option<&str>) -> Value {
    let mut must = Vec::with_capacity(2);
    if let Some(filter) = filter {
        must.push(json!({
            "query_string": {
                "query": filter,
                "default_operator": "AND"
            }
        }));
    }
    must.push(json!({
        "range": {
            "@timestamp": {
                "gte": format_timestamp(&window.lower),
                "lte": format_timestamp(&window.upper),
                "format": "strict_date_optional_time"
            }
        }
    }));

    json!({
        "from": 0,
        "size": limit,
        "query": {
            "bool": {
                "must": must
            }
        },
        "sort": [
            { "@timestamp": { "order": "asc" } }
        ]
    })
}

/// Extract the `(gte, lte)` pair of a body produced by [`build_query`]
pub fn range_bounds(body: &Value) -> Option<(String, String)> {
    let must = body.pointer("/query/bool/must")?.as_array()?;
    must.iter().find_map(|clause| {
        let range = clause.pointer("/range/@timestamp")?;
        Some((
            range.get("gte")?.as_str()?.to_string(),
            range.get("lte")?.as_str()?.to_string(),
        ))
    })
}
