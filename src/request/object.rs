// src/request/object.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::errors::{Result, TrackerError};
use crate::request::backend::{HttpRequestBackend, RequestBackend, TransferSpec};
use crate::request::events::{EventKind, EventListener, TerminalEvent};
use crate::request::instrument;
use crate::types::Resource;

/// State recorded at `open` time and read at terminal-event time; it lives
/// and dies with the request instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: String,
    pub url: String,
}

/// Event-driven, two-phase network request.
///
/// Lifecycle: `open(method, url)` records the target, `send(body)` runs the
/// exchange and fires exactly one terminal event (`load`, `error`,
/// `timeout`, or `abort`) to every listener subscribed to that kind.
///
/// Listeners accumulate: there is no removal, and a second `send` on the
/// same instance fires the full accumulated set again.
pub struct NetworkRequest {
    backend: Arc<dyn RequestBackend>,
    context: Option<RequestContext>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    listeners: Vec<(EventKind, EventListener)>,
}

impl fmt::Debug for NetworkRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkRequest")
            .field("context", &self.context)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl NetworkRequest {
    /// New request over the production HTTP backend.
    pub fn new() -> Result<Self> {
        Ok(Self::with_backend(Arc::new(HttpRequestBackend::new()?)))
    }

    /// New request over a caller-supplied transport.
    pub fn with_backend(backend: Arc<dyn RequestBackend>) -> Self {
        Self {
            backend,
            context: None,
            headers: Vec::new(),
            timeout: None,
            listeners: Vec::new(),
        }
    }

    /// Phase one: record method and target.
    ///
    /// `url` may be a string or an already-parsed `Url`; it is stringified
    /// before storage. Both values are handed to the transport verbatim at
    /// send time.
    pub fn open(&mut self, method: impl Into<String>, url: impl Into<Resource>) {
        let context = RequestContext {
            method: method.into(),
            url: url.into().into_string(),
        };
        debug!(method = %context.method, url = %context.url, "request opened");
        self.context = Some(context);
    }

    /// Add a header to the exchange. Repeated names are kept in order.
    pub fn set_request_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Bound the exchange; an elapsed bound surfaces as the `timeout`
    /// terminal event.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Subscribe to a terminal event kind. Listeners are fired in
    /// subscription order and are never removed.
    pub fn add_event_listener(&mut self, kind: EventKind, listener: EventListener) {
        self.listeners.push((kind, listener));
    }

    /// Context recorded by `open`, if any.
    pub fn context(&self) -> Option<&RequestContext> {
        self.context.as_ref()
    }

    /// Phase two: run the exchange.
    ///
    /// Every installed [`SendInstrumentation`](crate::request::SendInstrumentation)
    /// is consulted first (this is where the tracker attaches its
    /// listeners), then the transfer is delegated to the backend with the
    /// body forwarded unchanged. The resulting terminal event is dispatched
    /// to listeners and returned.
    ///
    /// Calling `send` before `open` is a caller bug: no exchange starts, no
    /// event fires.
    pub async fn send(&mut self, body: Option<Vec<u8>>) -> Result<TerminalEvent> {
        for instrumentation in instrument::installed() {
            instrumentation.before_send(self);
        }

        let Some(context) = self.context.clone() else {
            return Err(TrackerError::RequestNotOpened);
        };

        let spec = TransferSpec {
            context: context.clone(),
            headers: self.headers.clone(),
            timeout: self.timeout,
            body,
        };

        let event = self.backend.execute(spec).await;
        debug!(
            method = %context.method,
            url = %context.url,
            event = event.name(),
            "request finished"
        );

        self.dispatch(&event);
        Ok(event)
    }

    fn dispatch(&self, event: &TerminalEvent) {
        for (kind, listener) in &self.listeners {
            if *kind == event.kind() {
                listener(event);
            }
        }
    }
}
