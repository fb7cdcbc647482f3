//! Deploy Event Port
//!
//! Stages never print. They emit events, and the sink decides how to show
//! them (terminal, NDJSON stream, nothing).

use std::time::Duration;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Ok,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Ok => "ok",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Event emitted during a deploy run
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Run started
    Started {
        destination: String,
        stage_count: usize,
    },

    /// A stage begins
    StageStarted {
        number: usize,
        total: usize,
        title: String,
    },

    /// A counted stage did not run
    StageSkipped { title: String, reason: String },

    /// Free-form progress line
    Log { level: Level, message: String },

    /// Deploy-wait countdown tick
    Countdown { remaining: Duration },

    /// Remote directory created during sync
    DirectoryCreated { path: String },

    /// File uploaded during sync
    FileUploaded {
        index: usize,
        path: String,
        bytes: u64,
    },

    /// Required token checked in the uploaded server config
    TokenChecked { token: String, present: bool },

    /// Run finished (fatal errors never reach this event)
    Completed {
        uploaded: usize,
        warnings: usize,
        errors: usize,
    },
}

impl DeployEvent {
    pub fn info(message: impl Into<String>) -> Self {
        DeployEvent::Log {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        DeployEvent::Log {
            level: Level::Ok,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        DeployEvent::Log {
            level: Level::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        DeployEvent::Log {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: banners and icon lines in the terminal
/// - JsonEventSink: NDJSON event stream
/// - NoopEventSink: silent operation
pub trait DeployEventSink {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Whether per-file events are wanted
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
