// src/request/backend.rs

//! Pluggable transport behind [`NetworkRequest`](crate::request::NetworkRequest).
//!
//! - `HttpRequestBackend` is the production implementation used by
//!   `NetworkRequest::new`.
//! - Tests can provide their own backend that records the transfer spec and
//!   yields a scripted terminal event.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::request::events::TerminalEvent;
use crate::request::object::RequestContext;

/// Everything the transport needs for one exchange, exactly as the caller
/// supplied it through `open`/`set_request_header`/`set_timeout`/`send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSpec {
    pub context: RequestContext,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub body: Option<Vec<u8>>,
}

/// Trait abstracting the exchange itself.
///
/// A backend never fails into the caller: every way an exchange can end
/// maps onto exactly one [`TerminalEvent`], mirroring the event contract of
/// the request object.
pub trait RequestBackend: Send + Sync {
    fn execute(&self, spec: TransferSpec) -> Pin<Box<dyn Future<Output = TerminalEvent> + Send>>;
}

/// Production backend over `reqwest`.
///
/// Mapping of outcomes:
/// - a completed exchange is `Load { status }`, whatever the status
/// - an elapsed per-request timeout is `Timeout`
/// - everything else (unreachable host, refused connection, bad method) is
///   `Error`
///
/// `Abort` is never produced here: this system initiates no cancellation,
/// it only observes aborts reported by backends that support them.
pub struct HttpRequestBackend {
    client: reqwest::Client,
}

impl HttpRequestBackend {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl RequestBackend for HttpRequestBackend {
    fn execute(&self, spec: TransferSpec) -> Pin<Box<dyn Future<Output = TerminalEvent> + Send>> {
        let client = self.client.clone();

        Box::pin(async move {
            let method = match reqwest::Method::from_bytes(spec.context.method.as_bytes()) {
                Ok(method) => method,
                Err(_) => {
                    warn!(method = %spec.context.method, "invalid request method");
                    return TerminalEvent::Error;
                }
            };

            let mut request = client.request(method, spec.context.url.clone());
            for (name, value) in &spec.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if let Some(timeout) = spec.timeout {
                request = request.timeout(timeout);
            }
            if let Some(body) = spec.body {
                request = request.body(body);
            }

            match request.send().await {
                Ok(response) => TerminalEvent::Load {
                    status: response.status().as_u16(),
                },
                Err(err) if err.is_timeout() => TerminalEvent::Timeout,
                Err(err) => {
                    debug!(url = %spec.context.url, error = %err, "request transport error");
                    TerminalEvent::Error
                }
            }
        })
    }
}
