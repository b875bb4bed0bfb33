// src/request/instrument.rs

//! Process-global send instrumentation.
//!
//! Every `NetworkRequest` consults the registry here at the top of `send`,
//! so an installed instrumentation observes all future requests in the
//! process, including ones created by code that has never heard of the
//! tracker. Registration is explicit and additive; nothing is ever
//! deregistered.
//!
//! [`FailureTracking`] is the instrumentation `start` installs; it is also
//! directly constructible for explicit-context use against a single
//! request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::report::{FailurePayload, Reporter};
use crate::request::events::{EventKind, TerminalEvent};
use crate::request::object::NetworkRequest;

static INSTRUMENTATIONS: LazyLock<RwLock<Vec<Arc<dyn SendInstrumentation>>>> =
    LazyLock::new(|| RwLock::new(Vec::new()));
static TRACKING_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Hook consulted at the top of every `send`.
pub trait SendInstrumentation: Send + Sync {
    /// Called before the exchange starts. Implementations typically attach
    /// listeners to the instance; they must not alter its target or body.
    fn before_send(&self, request: &mut NetworkRequest);
}

/// Register an instrumentation for every future request in the process.
///
/// There is no deregistration; like the other global installations, this
/// lasts for the lifetime of the process.
pub fn register(instrumentation: Arc<dyn SendInstrumentation>) {
    let mut registry = INSTRUMENTATIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    registry.push(instrumentation);
    debug!(installed = registry.len(), "send instrumentation registered");
}

/// Snapshot of the registry, taken once per send.
pub(crate) fn installed() -> Vec<Arc<dyn SendInstrumentation>> {
    INSTRUMENTATIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Failure classification for completed exchanges: everything outside
/// [200, 300) is reported. Note the asymmetry with the fetch path, which
/// reports no status at all.
pub fn failure_status(status: u16) -> bool {
    !(200..300).contains(&status)
}

/// The tracker's instrumentation: classify terminal events and report the
/// failures.
///
/// Policy per event:
/// - `load` with a failure status: report the bare status code
/// - `error` / `timeout` / `abort`: report the bare event name
///
/// Listeners only observe; the request's own event contract is untouched.
pub struct FailureTracking {
    reporter: Reporter,
}

impl FailureTracking {
    pub fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }
}

impl SendInstrumentation for FailureTracking {
    fn before_send(&self, request: &mut NetworkRequest) {
        let context = request.context().cloned();

        // load fires for every completed exchange; non-2xx is the failure
        // policy on this path.
        let reporter = self.reporter.clone();
        let load_context = context.clone();
        request.add_event_listener(
            EventKind::Load,
            Arc::new(move |event: &TerminalEvent| {
                if let TerminalEvent::Load { status } = event {
                    if failure_status(*status) {
                        warn!(
                            method = load_context.as_ref().map_or("UNKNOWN", |c| c.method.as_str()),
                            url = load_context.as_ref().map_or("UNKNOWN", |c| c.url.as_str()),
                            status = *status,
                            "request completed with failure status"
                        );
                        reporter.enqueue(FailurePayload::status(*status));
                    }
                }
            }),
        );

        for kind in [EventKind::Error, EventKind::Timeout, EventKind::Abort] {
            let reporter = self.reporter.clone();
            let context = context.clone();
            request.add_event_listener(
                kind,
                Arc::new(move |event: &TerminalEvent| {
                    warn!(
                        method = context.as_ref().map_or("UNKNOWN", |c| c.method.as_str()),
                        url = context.as_ref().map_or("UNKNOWN", |c| c.url.as_str()),
                        event = event.name(),
                        "request failed"
                    );
                    reporter.enqueue(FailurePayload::event(event.name()));
                }),
            );
        }
    }
}

/// Install [`FailureTracking`] globally, once.
///
/// Idempotent: a second installation is a no-op, so repeated `start` calls
/// cannot stack listeners.
pub fn install_request_tracking(reporter: Reporter) {
    if TRACKING_INSTALLED.swap(true, Ordering::SeqCst) {
        debug!("request tracking already installed; leaving existing instrumentation in place");
        return;
    }

    register(Arc::new(FailureTracking::new(reporter)));
    info!("network request tracking installed");
}
