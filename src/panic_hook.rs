// src/panic_hook.rs

//! Global uncaught-error listener.
//!
//! The closest thing a Rust process has to a top-level error event is the
//! panic hook, so that is what the tracker subscribes to. The installed
//! hook:
//! - builds a report from the panic message and location and enqueues it
//! - then delegates to the previously installed hook, so default handling
//!   (backtrace printing, test-harness capture) still applies
//!
//! It is never uninstalled. Enqueueing is a synchronous `try_send`, safe
//! from whichever thread is panicking.

use std::panic::PanicHookInfo;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use tracing::{debug, info};

use crate::report::{FailurePayload, Reporter};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install panic reporting, once.
///
/// Idempotent: a second installation is a no-op, so repeated `start` calls
/// cannot chain the hook onto itself.
pub fn install_panic_reporting(reporter: Reporter) {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        debug!("panic reporting already installed; leaving existing hook in place");
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        reporter.enqueue(payload_for(info));
        previous(info);
    }));

    info!("panic reporting installed");
}

fn payload_for(info: &PanicHookInfo<'_>) -> FailurePayload {
    let message = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));

    FailurePayload::error_value(json!({
        "message": message,
        "location": location,
    }))
}
