use beatdump_fetch::{
    FetchSettings, IncrementOutcome, SkipReason, TransportError, WindowPolicy, WindowedFetcher,
};
use beatdump_testing::ScriptedTransport;
use beatdump_types::TimeRange;
use chrono::Duration;
use serde_json::{Value, json};

fn log_hit(id: &str, ts: &str) -> Value {
    json!({
        "_index": "metricbeat-8.15",
        "_id": id,
        "_source": {"@timestamp": ts, "data_stream.type": "logs", "message": id}
    })
}

fn two_second_range() -> TimeRange {
    TimeRange::parse("2024-12-14T00:00:00.000Z", "2024-12-14T00:00:02.000Z").unwrap()
}

#[test]
fn test_cumulative_windows_issue_two_queries_from_range_start() {
    let transport = ScriptedTransport::new();
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 10))
            .unwrap();

    fetcher.fetch(&two_second_range());

    assert_eq!(
        transport.query_bounds(),
        vec![
            (
                "2024-12-14T00:00:00.000Z".to_string(),
                "2024-12-14T00:00:01.000Z".to_string()
            ),
            (
                "2024-12-14T00:00:00.000Z".to_string(),
                "2024-12-14T00:00:02.000Z".to_string()
            ),
        ]
    );
    for body in transport.queries() {
        assert_eq!(body["size"], 10);
        assert_eq!(body["from"], 0);
    }
}

#[test]
fn test_sliding_windows_advance_lower_bound() {
    let transport = ScriptedTransport::new();
    let settings =
        FetchSettings::new(Duration::milliseconds(1000), 10).with_policy(WindowPolicy::Sliding);
    let fetcher = WindowedFetcher::new(&transport, settings).unwrap();

    fetcher.fetch(&two_second_range());

    let bounds = transport.query_bounds();
    assert_eq!(bounds.len(), 2);
    assert_eq!(bounds[1].0, "2024-12-14T00:00:01.000Z");
    assert_eq!(bounds[1].1, "2024-12-14T00:00:02.000Z");
}

#[test]
fn test_even_step_issues_exact_increment_count() {
    let transport = ScriptedTransport::new();
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(250), 10))
            .unwrap();
    let range = TimeRange::parse("2024-12-14T00:00:00.000Z", "2024-12-14T00:00:05.000Z").unwrap();

    let report = fetcher.fetch(&range);

    assert_eq!(report.increments.len(), 20);
    assert_eq!(transport.query_count(), 20);
}

#[test]
fn test_transport_fault_does_not_stop_later_increments() {
    let transport = ScriptedTransport::new()
        .fail(TransportError::Timeout("operation timed out".to_string()))
        .reply_page(vec![log_hit("second", "2024-12-14T00:00:01.500Z")], 1);
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 10))
            .unwrap();

    let report = fetcher.fetch(&two_second_range());

    assert_eq!(transport.query_count(), 2);
    assert_eq!(
        report.increments[0].outcome,
        IncrementOutcome::Skipped(SkipReason::Transport {
            kind: "timeout",
            message: "operation timed out".to_string()
        })
    );
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].as_value()["_id"], "second");
}

#[test]
fn test_cumulative_overlap_is_not_deduplicated() {
    let first = log_hit("a", "2024-12-14T00:00:00.200Z");
    let second = log_hit("b", "2024-12-14T00:00:01.200Z");
    let transport = ScriptedTransport::new()
        .reply_page(vec![first.clone()], 1)
        .reply_page(vec![first, second], 2);
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 10))
            .unwrap();

    let records = fetcher.fetch_records(&two_second_range());

    let ids: Vec<_> = records
        .iter()
        .map(|r| r.as_value()["_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "a", "b"]);
}

#[test]
fn test_truncation_signalled_only_when_total_exceeds_limit() {
    let hits: Vec<_> = (0..2)
        .map(|i| log_hit(&i.to_string(), "2024-12-14T00:00:00.100Z"))
        .collect();
    let transport = ScriptedTransport::new()
        .reply_page(hits.clone(), 2)
        .reply_page(hits, 5);
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 2))
            .unwrap();

    let report = fetcher.fetch(&two_second_range());

    assert!(!report.increments[0].is_truncated());
    assert!(report.increments[1].is_truncated());
    assert_eq!(report.dropped_estimate(), 3);
    assert_eq!(report.records.len(), 4);
}

#[test]
fn test_fetcher_rejects_zero_limit() {
    let settings = FetchSettings::new(Duration::milliseconds(1000), 0);
    assert!(WindowedFetcher::new(ScriptedTransport::new(), settings).is_err());
}

#[test]
fn test_empty_range_issues_no_queries() {
    let transport = ScriptedTransport::new();
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 10))
            .unwrap();
    let range = TimeRange::parse("2024-12-14T00:00:00.000Z", "2024-12-14T00:00:00.000Z").unwrap();

    let report = fetcher.fetch(&range);

    assert!(report.records.is_empty());
    assert!(report.increments.is_empty());
    assert_eq!(transport.query_count(), 0);
}

#[test]
fn test_non_success_status_is_skipped() {
    let transport = ScriptedTransport::new()
        .reply_status(503)
        .reply_page(vec![log_hit("a", "2024-12-14T00:00:01.200Z")], 1);
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 10))
            .unwrap();

    let report = fetcher.fetch(&two_second_range());

    assert_eq!(report.records.len(), 1);
    assert_eq!(
        report.increments[0].skip_reason(),
        Some(&SkipReason::Status(503))
    );
    assert_eq!(report.skipped_increments(), 1);
}

#[test]
fn test_malformed_body_is_skipped() {
    let transport = ScriptedTransport::new().reply_raw(200, "not json");
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 10))
            .unwrap();
    let range = TimeRange::parse("2024-12-14T00:00:00.000Z", "2024-12-14T00:00:01.000Z").unwrap();

    let report = fetcher.fetch(&range);

    assert!(matches!(
        report.increments[0].skip_reason(),
        Some(SkipReason::Malformed(_))
    ));
}

#[test]
fn test_truncation_keeps_records_and_reports_drop() {
    let hits: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|id| log_hit(id, "2024-12-14T00:00:00.100Z"))
        .collect();
    let transport = ScriptedTransport::new().reply_page(hits, 7);
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(1000), 3))
            .unwrap();
    let range = TimeRange::parse("2024-12-14T00:00:00.000Z", "2024-12-14T00:00:01.000Z").unwrap();

    let report = fetcher.fetch(&range);

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.truncated_increments(), 1);
    assert_eq!(report.dropped_estimate(), 4);
    assert_eq!(transport.query_count(), 1);
}

#[test]
fn test_callback_sees_every_increment() {
    let transport =
        ScriptedTransport::new().fail(TransportError::Connect("refused".to_string()));
    let fetcher =
        WindowedFetcher::new(&transport, FetchSettings::new(Duration::milliseconds(500), 10))
            .unwrap();

    let mut seen = Vec::new();
    fetcher.fetch_with(&two_second_range(), |inc| seen.push(inc.window.index));

    assert_eq!(seen, vec![0, 1, 2, 3]);
}

#[test]
fn test_filter_is_sent_with_each_query() {
    let transport = ScriptedTransport::new();
    let settings = FetchSettings::new(Duration::milliseconds(1000), 10).with_filter("svc-42");
    let fetcher = WindowedFetcher::new(&transport, settings).unwrap();

    fetcher.fetch(&two_second_range());

    let queries = transport.queries();
    assert_eq!(queries.len(), 2);
    for body in queries {
        assert_eq!(
            body["query"]["bool"]["must"][0]["query_string"]["query"],
            "svc-42"
        );
    }
}

#[test]
fn test_step_beyond_calendar_limit_issues_single_query() {
    let transport = ScriptedTransport::new();
    let fetcher = WindowedFetcher::new(
        &transport,
        FetchSettings::new(Duration::milliseconds(9_000_000_000_000_000), 10),
    )
    .unwrap();

    let report = fetcher.fetch(&two_second_range());

    assert_eq!(report.increments.len(), 1);
    assert_eq!(
        transport.query_bounds(),
        vec![(
            "2024-12-14T00:00:00.000Z".to_string(),
            "2024-12-14T00:00:02.000Z".to_string()
        )]
    );
}
