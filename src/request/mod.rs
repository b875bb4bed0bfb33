// src/request/mod.rs

//! The event-driven, two-phase (open/send) network request primitive.
//!
//! This module ties together:
//! - the terminal event model (`load` / `error` / `timeout` / `abort`)
//! - the request object itself, with its listener registry
//! - the transport backend abstraction and the production implementation
//! - the process-global send instrumentation the tracker installs

pub mod backend;
pub mod events;
pub mod instrument;
pub mod object;

pub use backend::{HttpRequestBackend, RequestBackend, TransferSpec};
pub use events::{EventKind, EventListener, TerminalEvent};
pub use instrument::{
    failure_status, install_request_tracking, register, FailureTracking, SendInstrumentation,
};
pub use object::{NetworkRequest, RequestContext};
