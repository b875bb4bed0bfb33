// tests/fetch_tracking.rs

use std::error::Error;
use std::sync::Arc;

use serde_json::json;

use greyarea::fetch::{Fetch, FetchError, FetchOptions, TrackedFetch};
use greyarea::report::{FailurePayload, Reporter};
use greyarea_test_utils::fakes::{FakeFetch, RecordingSink};
use greyarea_test_utils::{init_tracing, recv_or_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn resolved_responses_pass_through_unchanged() -> TestResult {
    init_tracing();

    let (sink, _rx) = RecordingSink::new();
    let reporter = Reporter::spawn(sink.clone(), 8, None);

    let inner = FakeFetch::succeeding_with_body(404, b"not found");
    let tracked = TrackedFetch::new(Arc::clone(&inner), reporter);

    let response = tracked
        .fetch("https://app.example/api/x".into(), FetchOptions::default())
        .await?;

    assert_eq!(response.status, 404);
    assert!(!response.ok());
    assert_eq!(response.body, b"not found");

    // Non-2xx on the fetch path is a resolved call: nothing may be reported.
    tokio::task::yield_now().await;
    assert!(sink.delivered().is_empty());

    Ok(())
}

#[tokio::test]
async fn network_failure_is_reported_and_rethrown() -> TestResult {
    init_tracing();

    let (sink, mut rx) = RecordingSink::new();
    let reporter = Reporter::spawn(sink.clone(), 8, None);

    let inner = FakeFetch::failing("dns failure");
    let tracked = TrackedFetch::new(inner, reporter);

    let err = tracked
        .fetch("https://app.example/api/x".into(), FetchOptions::default())
        .await
        .unwrap_err();

    // The caller sees the original error, not a reporting artifact.
    assert!(matches!(err, FetchError::Network(ref m) if m == "dns failure"));

    let report = recv_or_timeout(&mut rx).await;
    assert_eq!(
        report.error,
        FailurePayload::error_value(json!({ "message": "network failure: dns failure" }))
    );
    assert_eq!(sink.delivered().len(), 1);

    Ok(())
}

#[tokio::test]
async fn arguments_are_forwarded_unchanged() -> TestResult {
    init_tracing();

    let (sink, _rx) = RecordingSink::new();
    let reporter = Reporter::spawn(sink, 8, None);

    let inner = FakeFetch::succeeding(200);
    let tracked = TrackedFetch::new(Arc::clone(&inner), reporter);

    let options = FetchOptions {
        method: Some("POST".to_string()),
        headers: vec![("x-request-id".to_string(), "42".to_string())],
        body: Some(b"ping".to_vec()),
    };

    tracked
        .fetch("https://app.example/api/send".into(), options.clone())
        .await?;

    let calls = inner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_str(), "https://app.example/api/send");
    assert_eq!(calls[0].1, options);

    Ok(())
}
