// src/logging.rs

//! Logging setup for `greyarea` using `tracing` + `tracing-subscriber`.
//!
//! The tracker itself only *emits* trace events; initialising a subscriber
//! is left to the host application. This module is a convenience for hosts
//! that don't already have one. Priority for determining the filter:
//! 1. `GREYAREA_LOG` environment variable (e.g. "info", "greyarea=debug")
//! 2. default to `info`

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read for the log filter.
pub const LOG_ENV_VAR: &str = "GREYAREA_LOG";

/// Initialise a global logging subscriber.
///
/// Safe to call once at startup; returns an error if the host already
/// installed a global subscriber.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Send logs to stderr; keep stdout free for the host application.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("installing global tracing subscriber")?;

    Ok(())
}
