//! Fake backends for exercising the tracker without any real network.
//!
//! - [`RecordingSink`] accepts every report and mirrors it onto a channel.
//! - [`FailingSink`] refuses every report, for failure-hook tests.
//! - [`FakeFetch`] is a scripted fetch that records its calls.
//! - [`ScriptedRequestBackend`] yields a fixed terminal event and records
//!   the transfer specs it received.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use greyarea::fetch::{Fetch, FetchError, FetchOptions, FetchResponse, FetchResult};
use greyarea::report::{DeliveryResult, Report, ReportSink};
use greyarea::request::{RequestBackend, TerminalEvent, TransferSpec};
use greyarea::types::Resource;

/// Sink that records every delivered report and mirrors it onto the
/// returned channel so tests can await dispatch.
pub struct RecordingSink {
    delivered: Mutex<Vec<Report>>,
    tx: mpsc::UnboundedSender<Report>,
}

impl RecordingSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Report>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Arc::new(Self {
            delivered: Mutex::new(Vec::new()),
            tx,
        });
        (sink, rx)
    }

    pub fn delivered(&self) -> Vec<Report> {
        self.delivered.lock().unwrap().clone()
    }
}

impl ReportSink for RecordingSink {
    fn deliver(&self, report: Report) -> Pin<Box<dyn Future<Output = DeliveryResult> + Send>> {
        self.delivered.lock().unwrap().push(report.clone());
        let _ = self.tx.send(report);
        Box::pin(async { Ok(()) })
    }
}

/// Sink that refuses every report.
pub struct FailingSink {
    attempts: Mutex<Vec<Report>>,
}

impl FailingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            attempts: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> Vec<Report> {
        self.attempts.lock().unwrap().clone()
    }
}

impl ReportSink for FailingSink {
    fn deliver(&self, report: Report) -> Pin<Box<dyn Future<Output = DeliveryResult> + Send>> {
        self.attempts.lock().unwrap().push(report);
        Box::pin(async { Err(anyhow::anyhow!("delivery refused")) })
    }
}

#[derive(Clone)]
enum FetchScript {
    Succeed { status: u16, body: Vec<u8> },
    Fail { message: String },
}

/// Scripted fetch implementation that records every call.
pub struct FakeFetch {
    script: FetchScript,
    calls: Mutex<Vec<(Resource, FetchOptions)>>,
}

impl FakeFetch {
    /// Resolve every call with the given status and an empty body.
    pub fn succeeding(status: u16) -> Arc<Self> {
        Self::succeeding_with_body(status, b"")
    }

    pub fn succeeding_with_body(status: u16, body: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            script: FetchScript::Succeed {
                status,
                body: body.to_vec(),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Reject every call with `FetchError::Network(message)`.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            script: FetchScript::Fail {
                message: message.to_string(),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(Resource, FetchOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetch for FakeFetch {
    fn fetch(
        &self,
        resource: Resource,
        options: FetchOptions,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send>> {
        self.calls.lock().unwrap().push((resource, options));
        let script = self.script.clone();

        Box::pin(async move {
            match script {
                FetchScript::Succeed { status, body } => Ok(FetchResponse {
                    status,
                    headers: Vec::new(),
                    body,
                }),
                FetchScript::Fail { message } => Err(FetchError::Network(message)),
            }
        })
    }
}

/// Backend that yields a fixed terminal event and records what it was asked
/// to transfer.
pub struct ScriptedRequestBackend {
    event: TerminalEvent,
    executed: Mutex<Vec<TransferSpec>>,
}

impl ScriptedRequestBackend {
    pub fn new(event: TerminalEvent) -> Arc<Self> {
        Arc::new(Self {
            event,
            executed: Mutex::new(Vec::new()),
        })
    }

    pub fn executed(&self) -> Vec<TransferSpec> {
        self.executed.lock().unwrap().clone()
    }
}

impl RequestBackend for ScriptedRequestBackend {
    fn execute(&self, spec: TransferSpec) -> Pin<Box<dyn Future<Output = TerminalEvent> + Send>> {
        self.executed.lock().unwrap().push(spec);
        let event = self.event.clone();
        Box::pin(async move { event })
    }
}
