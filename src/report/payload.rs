// src/report/payload.rs

use serde::Serialize;
use serde_json::Value;

/// The value carried by a single failure report.
///
/// The three interception paths produce three different shapes on the wire:
/// a serialized error value, a bare HTTP status code, or a bare event-name
/// string. The looseness is intentional: the collection endpoint receives
/// whatever the failure path observed, with no normalization between paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FailurePayload {
    /// HTTP status code from a completed request outside [200, 300).
    Status(u16),
    /// Terminal event name (`"error"`, `"timeout"`, `"abort"`).
    Event(String),
    /// Serialized error value (fetch rejection, uncaught panic).
    Error(Value),
}

impl FailurePayload {
    pub fn status(code: u16) -> Self {
        FailurePayload::Status(code)
    }

    pub fn event(name: impl Into<String>) -> Self {
        FailurePayload::Event(name.into())
    }

    pub fn error_value(value: Value) -> Self {
        FailurePayload::Error(value)
    }
}

/// One outbound report. Serializes to exactly `{"error": <payload>}`,
/// which is the entire wire format: no envelope versioning, no auth, no
/// metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub error: FailurePayload,
}

impl Report {
    pub fn new(error: FailurePayload) -> Self {
        Self { error }
    }
}
