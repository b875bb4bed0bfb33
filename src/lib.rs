// src/lib.rs

//! Drop-in network failure telemetry.
//!
//! `greyarea` watches the failure paths of an application's HTTP traffic
//! and forwards them, best effort, to a collection endpoint:
//!
//! - network-level failures of the promise-style [`fetch`](fetch::fetch)
//!   primitive
//! - terminal failures (`load` with a non-2xx status, `error`, `timeout`,
//!   `abort`) of the event-driven [`NetworkRequest`](request::NetworkRequest)
//!   primitive
//! - uncaught panics
//!
//! One call to [`start`] wires all of it up. Everything the tracker does is
//! observational: wrapped calls keep their exact results, listeners cannot
//! interfere with other listeners, and report delivery never blocks or
//! fails into the caller.
//!
//! The wrappers are also usable piecemeal, with an explicit
//! [`Reporter`](report::Reporter), for hosts that want several independent
//! trackers instead of the global installation.

pub mod config;
pub mod env;
pub mod errors;
pub mod fetch;
pub mod logging;
pub mod panic_hook;
pub mod report;
pub mod request;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{TrackerConfig, TrackerOptions};
use crate::errors::Result;
use crate::fetch::install_fetch_tracking;
use crate::report::{HttpSink, Reporter};
use crate::request::install_request_tracking;

/// Handle returned by [`start`].
///
/// Holds the immutable configuration and a reporter clone; dropping it
/// changes nothing, as the installed wrappers keep their own clones for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct Tracker {
    config: Arc<TrackerConfig>,
    reporter: Reporter,
}

impl Tracker {
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The reporter feeding this tracker's dispatch queue, for callers that
    /// want to wire additional wrappers explicitly.
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }
}

/// High-level entry point.
///
/// This wires together:
/// - option merge + collection URL validation
/// - environment capability probe
/// - report sink + bounded dispatcher
/// - panic reporting (always)
/// - fetch tracking (if `track_fetch`)
/// - request-object tracking (if `track_network_requests`)
///
/// Must be called within a tokio runtime; the probe turns a missing one
/// into a typed error. Installation is global, install-once guarded, and
/// never undone; there is no teardown operation.
pub fn start(collection_url: &str, options: TrackerOptions) -> Result<Tracker> {
    env::ensure_supported()?;

    let config = TrackerConfig::from_options(collection_url, &options)?;
    info!(
        collection_url = %config.collection_url,
        track_fetch = config.track_fetch,
        track_network_requests = config.track_network_requests,
        "starting tracker"
    );

    let sink = Arc::new(HttpSink::new(config.collection_url.clone())?);
    let reporter = Reporter::spawn(
        sink,
        config.report_queue_capacity,
        options.delivery_failure_hook.clone(),
    );

    panic_hook::install_panic_reporting(reporter.clone());

    if config.track_fetch {
        install_fetch_tracking(reporter.clone())?;
    } else {
        debug!("fetch tracking disabled by options");
    }

    if config.track_network_requests {
        install_request_tracking(reporter.clone());
    } else {
        debug!("network request tracking disabled by options");
    }

    Ok(Tracker {
        config: Arc::new(config),
        reporter,
    })
}
