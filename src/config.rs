// src/config.rs

use std::fmt;

use url::Url;

use crate::errors::{Result, TrackerError};
use crate::report::DeliveryFailureHook;

/// Default capacity of the bounded report queue.
pub const DEFAULT_REPORT_QUEUE_CAPACITY: usize = 64;

/// Caller-supplied options for [`start`](crate::start).
///
/// Every field is optional; unset fields fall back to the defaults
/// documented on [`TrackerConfig`]. Options are merged once at start time
/// and never consulted again.
#[derive(Clone, Default)]
pub struct TrackerOptions {
    /// Install the fetch-binding wrapper. Default: `true`.
    pub track_fetch: Option<bool>,

    /// Install the request-object instrumentation. Default: `true`.
    pub track_network_requests: Option<bool>,

    /// Capacity of the bounded report queue. Default: 64, minimum 1.
    pub report_queue_capacity: Option<usize>,

    /// Callback invoked when a report is dropped (queue full, dispatcher
    /// gone, or sink delivery error). Default: drop with a debug-level
    /// trace line.
    pub delivery_failure_hook: Option<DeliveryFailureHook>,
}

impl fmt::Debug for TrackerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerOptions")
            .field("track_fetch", &self.track_fetch)
            .field("track_network_requests", &self.track_network_requests)
            .field("report_queue_capacity", &self.report_queue_capacity)
            .field(
                "delivery_failure_hook",
                &self.delivery_failure_hook.as_ref().map(|_| "<hook>"),
            )
            .finish()
    }
}

/// Validated tracker configuration. Immutable once the tracker is started.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Where failure reports are POSTed.
    pub collection_url: Url,

    /// Whether the global fetch binding is wrapped.
    pub track_fetch: bool,

    /// Whether the request-object instrumentation is installed.
    pub track_network_requests: bool,

    /// Capacity of the bounded report queue.
    pub report_queue_capacity: usize,
}

impl TrackerConfig {
    /// Merge `options` over the defaults and validate the collection URL.
    ///
    /// `queue_capacity` is clamped to at least 1, as a zero-length queue
    /// would make enqueueing meaningless.
    pub fn from_options(collection_url: &str, options: &TrackerOptions) -> Result<Self> {
        let collection_url =
            Url::parse(collection_url).map_err(|source| TrackerError::InvalidCollectionUrl {
                url: collection_url.to_string(),
                source,
            })?;

        Ok(Self {
            collection_url,
            track_fetch: options.track_fetch.unwrap_or(true),
            track_network_requests: options.track_network_requests.unwrap_or(true),
            report_queue_capacity: options
                .report_queue_capacity
                .unwrap_or(DEFAULT_REPORT_QUEUE_CAPACITY)
                .max(1),
        })
    }
}
