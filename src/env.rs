// src/env.rs

//! Environment capability detection.
//!
//! Installation has one hard environmental requirement: the report
//! dispatcher is a background task, so an async runtime must be reachable
//! from the calling thread. Rather than letting `tokio::spawn` panic deep
//! inside [`start`](crate::start), the probe here turns a missing runtime
//! into a typed error up front.

use crate::errors::{Result, TrackerError};

/// True when a tokio runtime is reachable from the current thread.
pub fn async_runtime_available() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

/// Verify everything `start` relies on, returning a typed error when the
/// environment cannot host the tracker.
pub fn ensure_supported() -> Result<()> {
    if !async_runtime_available() {
        return Err(TrackerError::Unsupported(
            "no async runtime on this thread; call start from within a tokio runtime".to_string(),
        ));
    }
    Ok(())
}
