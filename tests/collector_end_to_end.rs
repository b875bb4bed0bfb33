// tests/collector_end_to_end.rs

//! Full wiring against a real loopback collector: `start`, the production
//! sink, the production fetch binding, and the production request backend.
//!
//! Keep this file to a single test: `start` installs process-global state,
//! and its dispatcher lives on this test's runtime.

use std::error::Error;
use std::net::TcpListener;

use greyarea::config::TrackerOptions;
use greyarea::fetch::{fetch, FetchOptions};
use greyarea::request::{NetworkRequest, TerminalEvent};
use greyarea_test_utils::collector::{spawn_collector, spawn_status_server};
use greyarea_test_utils::{init_tracing, recv_or_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn tracked_failures_reach_the_collection_endpoint() -> TestResult {
    init_tracing();

    let (collect_url, mut collected) = spawn_collector()?;

    let tracker = greyarea::start(&collect_url, TrackerOptions::default())?;
    assert!(tracker.config().track_fetch);
    assert!(tracker.config().track_network_requests);

    // Scenario one: a fetch that cannot complete. Bind-then-drop a listener
    // to get a port with nothing behind it.
    let dead_port = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let result = fetch(
        format!("http://127.0.0.1:{dead_port}/down"),
        FetchOptions::default(),
    )
    .await;
    assert!(result.is_err());

    let posted = recv_or_timeout(&mut collected).await;
    assert_eq!(posted.method, "POST");
    assert_eq!(posted.path, "/log");
    assert_eq!(posted.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&posted.body)?;
    assert!(
        body["error"]["message"].is_string(),
        "unexpected body: {body}"
    );

    // Scenario two: a request object completing with a server error.
    let origin = spawn_status_server(500)?;

    let mut request = NetworkRequest::new()?;
    request.open("GET", origin);
    let outcome = request.send(None).await?;
    assert_eq!(outcome, TerminalEvent::Load { status: 500 });

    let posted = recv_or_timeout(&mut collected).await;
    assert_eq!(posted.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&posted.body)?;
    assert_eq!(body, serde_json::json!({ "error": 500 }));

    Ok(())
}
