// tests/reporter_dispatch.rs

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use greyarea::report::{
    DeliveryFailure, DeliveryFailureHook, FailurePayload, Report, Reporter,
};
use greyarea_test_utils::fakes::{FailingSink, RecordingSink};
use greyarea_test_utils::{init_tracing, recv_or_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn wire_body_is_exactly_error_and_payload() -> TestResult {
    assert_eq!(
        serde_json::to_value(Report::new(FailurePayload::status(404)))?,
        json!({ "error": 404 })
    );
    assert_eq!(
        serde_json::to_value(Report::new(FailurePayload::event("abort")))?,
        json!({ "error": "abort" })
    );
    assert_eq!(
        serde_json::to_value(Report::new(FailurePayload::error_value(json!({
            "message": "boom"
        }))))?,
        json!({ "error": { "message": "boom" } })
    );
    Ok(())
}

#[tokio::test]
async fn full_queue_drops_and_notifies_the_hook() -> TestResult {
    init_tracing();

    let (sink, mut rx) = RecordingSink::new();

    let drops = Arc::new(Mutex::new(Vec::new()));
    let hook: DeliveryFailureHook = {
        let drops = Arc::clone(&drops);
        Arc::new(move |failure: &DeliveryFailure| {
            if let DeliveryFailure::QueueFull { report } = failure {
                drops.lock().unwrap().push(report.clone());
            }
        })
    };

    let reporter = Reporter::spawn(sink.clone(), 2, Some(hook));

    // No await between enqueues: on a current-thread runtime the dispatcher
    // cannot drain yet, so the third report must overflow the queue.
    reporter.enqueue(FailurePayload::status(500));
    reporter.enqueue(FailurePayload::status(501));
    reporter.enqueue(FailurePayload::status(502));

    {
        let drops = drops.lock().unwrap();
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].error, FailurePayload::status(502));
    }

    // The two accepted reports still arrive, in order.
    assert_eq!(
        recv_or_timeout(&mut rx).await.error,
        FailurePayload::status(500)
    );
    assert_eq!(
        recv_or_timeout(&mut rx).await.error,
        FailurePayload::status(501)
    );
    assert_eq!(sink.delivered().len(), 2);

    Ok(())
}

#[tokio::test]
async fn sink_failure_invokes_the_hook_per_report() -> TestResult {
    init_tracing();

    let sink = FailingSink::new();

    let (hook_tx, mut hook_rx) = mpsc::unbounded_channel();
    let hook: DeliveryFailureHook = Arc::new(move |failure: &DeliveryFailure| {
        if let DeliveryFailure::Delivery { report, .. } = failure {
            let _ = hook_tx.send(report.clone());
        }
    });

    let reporter = Reporter::spawn(sink.clone(), 8, Some(hook));

    reporter.enqueue(FailurePayload::status(500));
    reporter.enqueue(FailurePayload::event("abort"));

    assert_eq!(
        recv_or_timeout(&mut hook_rx).await.error,
        FailurePayload::status(500)
    );
    assert_eq!(
        recv_or_timeout(&mut hook_rx).await.error,
        FailurePayload::event("abort")
    );
    assert_eq!(sink.attempts().len(), 2);

    Ok(())
}

#[tokio::test]
async fn default_hook_drops_failed_deliveries_quietly() -> TestResult {
    init_tracing();

    let sink = FailingSink::new();
    let reporter = Reporter::spawn(sink.clone(), 8, None);

    reporter.enqueue(FailurePayload::status(500));

    // Give the dispatcher a chance to attempt (and fail) the delivery. The
    // enqueue itself must stay silent: no panic, no error to observe.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.attempts().len(), 1);

    Ok(())
}

#[tokio::test]
async fn queue_capacity_is_clamped_to_at_least_one() -> TestResult {
    init_tracing();

    let (sink, mut rx) = RecordingSink::new();
    let reporter = Reporter::spawn(sink, 0, None);

    reporter.enqueue(FailurePayload::status(500));
    assert_eq!(
        recv_or_timeout(&mut rx).await.error,
        FailurePayload::status(500)
    );

    Ok(())
}
