// src/request/events.rs

use std::sync::Arc;

/// Kinds of terminal events a request can emit, used to key listener
/// subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Load,
    Error,
    Timeout,
    Abort,
}

/// The single completion signal one `send` produces.
///
/// Exactly one of these fires per send, and they are mutually exclusive:
/// a request that times out never also loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// The exchange completed with a response, any status (4xx and 5xx
    /// included).
    Load { status: u16 },
    /// The exchange could not complete at all.
    Error,
    /// The per-request timeout elapsed first.
    Timeout,
    /// The transfer was aborted before completion.
    Abort,
}

impl TerminalEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TerminalEvent::Load { .. } => EventKind::Load,
            TerminalEvent::Error => EventKind::Error,
            TerminalEvent::Timeout => EventKind::Timeout,
            TerminalEvent::Abort => EventKind::Abort,
        }
    }

    /// Event name as it appears in reports for non-load failures.
    pub fn name(&self) -> &'static str {
        match self {
            TerminalEvent::Load { .. } => "load",
            TerminalEvent::Error => "error",
            TerminalEvent::Timeout => "timeout",
            TerminalEvent::Abort => "abort",
        }
    }
}

/// Observer callback for terminal events.
///
/// Listeners see the event by shared reference and get no channel to alter
/// it or the request outcome; they only observe.
pub type EventListener = Arc<dyn Fn(&TerminalEvent) + Send + Sync>;
