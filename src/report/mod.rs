// src/report/mod.rs

//! Failure reports and their delivery path.
//!
//! This module ties together:
//! - the payload model (what a report carries)
//! - the sink abstraction (how one report is delivered)
//! - the bounded dispatch queue between wrappers and the sink

pub mod dispatch;
pub mod payload;
pub mod sink;

pub use dispatch::{DeliveryFailure, DeliveryFailureHook, Reporter};
pub use payload::{FailurePayload, Report};
pub use sink::{DeliveryResult, HttpSink, ReportSink};
