// src/report/dispatch.rs

//! Bounded best-effort report dispatch.
//!
//! Wrappers hand payloads to a [`Reporter`]; a background task drains the
//! queue and pushes each report into the sink. The queue is the only
//! coupling between interception and delivery, and it is deliberately
//! shallow: telemetry must never block or fail into the caller's control
//! flow, so an overflowing queue drops reports instead of applying
//! backpressure.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::report::payload::{FailurePayload, Report};
use crate::report::sink::ReportSink;

/// Why a report was dropped instead of delivered.
#[derive(Debug)]
pub enum DeliveryFailure {
    /// The bounded queue was full; the report never left the caller.
    QueueFull { report: Report },
    /// The dispatcher is gone; the report never left the caller.
    DispatcherGone { report: Report },
    /// The sink failed after the report was dequeued.
    Delivery {
        report: Report,
        error: anyhow::Error,
    },
}

/// Observer for dropped reports. Must not block; it runs on whichever
/// thread noticed the failure.
pub type DeliveryFailureHook = Arc<dyn Fn(&DeliveryFailure) + Send + Sync>;

/// Handle used by all wrappers to submit failure payloads.
///
/// Cheap to clone; every clone feeds the same queue and dispatcher.
#[derive(Clone)]
pub struct Reporter {
    tx: mpsc::Sender<Report>,
    hook: DeliveryFailureHook,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

impl Reporter {
    /// Spawn the background dispatcher and return the submission handle.
    ///
    /// `capacity` is clamped to at least 1. The dispatcher runs until every
    /// `Reporter` clone is dropped; there is no explicit shutdown, matching
    /// the install-for-process-lifetime model of the wrappers that hold it.
    pub fn spawn(
        sink: Arc<dyn ReportSink>,
        capacity: usize,
        hook: Option<DeliveryFailureHook>,
    ) -> Reporter {
        let capacity = capacity.max(1);
        let (tx, mut rx) = mpsc::channel::<Report>(capacity);
        let hook = hook.unwrap_or_else(default_hook);

        let dispatch_hook = Arc::clone(&hook);
        tokio::spawn(async move {
            debug!("report dispatcher started");
            while let Some(report) = rx.recv().await {
                if let Err(error) = sink.deliver(report.clone()).await {
                    dispatch_hook(&DeliveryFailure::Delivery { report, error });
                }
            }
            debug!("report dispatcher finished (channel closed)");
        });

        Reporter { tx, hook }
    }

    /// Submit one failure payload, best effort.
    ///
    /// Never blocks and never fails into the caller: a full queue or a gone
    /// dispatcher drops the report and notifies the hook.
    pub fn enqueue(&self, payload: FailurePayload) {
        let report = Report::new(payload);
        match self.tx.try_send(report) {
            Ok(()) => {}
            Err(TrySendError::Full(report)) => {
                (self.hook)(&DeliveryFailure::QueueFull { report });
            }
            Err(TrySendError::Closed(report)) => {
                (self.hook)(&DeliveryFailure::DispatcherGone { report });
            }
        }
    }
}

fn default_hook() -> DeliveryFailureHook {
    Arc::new(|failure: &DeliveryFailure| {
        // Reports are best effort by contract; the default is to drop
        // quietly, visible only under a debug filter.
        debug!(?failure, "report dropped");
    })
}
