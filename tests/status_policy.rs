// tests/status_policy.rs

//! The two interception paths deliberately disagree about HTTP statuses:
//! the fetch wrapper reports nothing for a resolved call whatever the
//! status, while the request-object listener reports every completed
//! exchange outside [200, 300). These tests pin that asymmetry down.

use std::error::Error;

use proptest::prelude::*;
use serde_json::json;

use greyarea::fetch::{Fetch, FetchOptions, TrackedFetch};
use greyarea::report::{FailurePayload, Reporter};
use greyarea::request::{
    failure_status, FailureTracking, NetworkRequest, SendInstrumentation, TerminalEvent,
};
use greyarea_test_utils::fakes::{FakeFetch, RecordingSink, ScriptedRequestBackend};
use greyarea_test_utils::{init_tracing, recv_or_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn status_404_reports_on_the_request_path_only() -> TestResult {
    init_tracing();

    // Fetch path: a resolved 404 is a success, zero reports.
    let (fetch_sink, _fetch_rx) = RecordingSink::new();
    let fetch_reporter = Reporter::spawn(fetch_sink.clone(), 8, None);
    let tracked = TrackedFetch::new(FakeFetch::succeeding(404), fetch_reporter);

    let response = tracked
        .fetch("https://app.example/api/x".into(), FetchOptions::default())
        .await?;
    assert_eq!(response.status, 404);

    tokio::task::yield_now().await;
    assert!(fetch_sink.delivered().is_empty());

    // Request path: a completed 404 is a failure, exactly one report.
    let (request_sink, mut request_rx) = RecordingSink::new();
    let request_reporter = Reporter::spawn(request_sink.clone(), 8, None);

    let backend = ScriptedRequestBackend::new(TerminalEvent::Load { status: 404 });
    let mut request = NetworkRequest::with_backend(backend);
    request.open("GET", "https://app.example/api/x");
    FailureTracking::new(request_reporter).before_send(&mut request);
    request.send(None).await?;

    let report = recv_or_timeout(&mut request_rx).await;
    assert_eq!(report.error, FailurePayload::status(404));
    assert_eq!(request_sink.delivered().len(), 1);

    // And the wire shape for that report is the bare number.
    assert_eq!(serde_json::to_value(&report)?, json!({ "error": 404 }));

    Ok(())
}

proptest! {
    #[test]
    fn sub_200_statuses_classify_as_failures(status in 0u16..200) {
        prop_assert!(failure_status(status));
    }

    #[test]
    fn two_hundreds_classify_as_successes(status in 200u16..300) {
        prop_assert!(!failure_status(status));
    }

    #[test]
    fn three_hundred_and_up_classify_as_failures(status in 300u16..=999) {
        prop_assert!(failure_status(status));
    }
}
