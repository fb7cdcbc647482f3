//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON shape of an event
pub fn event_to_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started {
            destination,
            stage_count,
        } => serde_json::json!({
            "event": "start",
            "destination": destination,
            "stage_count": stage_count,
        }),

        DeployEvent::StageStarted {
            number,
            total,
            title,
        } => serde_json::json!({
            "event": "stage_start",
            "number": number,
            "total": total,
            "title": title,
        }),

        DeployEvent::StageSkipped { title, reason } => serde_json::json!({
            "event": "stage_skipped",
            "title": title,
            "reason": reason,
        }),

        DeployEvent::Log { level, message } => serde_json::json!({
            "event": "log",
            "level": level.as_str(),
            "message": message,
        }),

        DeployEvent::Countdown { remaining } => serde_json::json!({
            "event": "countdown",
            "remaining_secs": remaining.as_secs(),
        }),

        DeployEvent::DirectoryCreated { path } => serde_json::json!({
            "event": "dir_created",
            "path": path,
        }),

        DeployEvent::FileUploaded { index, path, bytes } => serde_json::json!({
            "event": "item_uploaded",
            "index": index,
            "path": path,
            "bytes": bytes,
        }),

        DeployEvent::TokenChecked { token, present } => serde_json::json!({
            "event": "token_checked",
            "token": token,
            "present": present,
        }),

        DeployEvent::Completed {
            uploaded,
            warnings,
            errors,
        } => {
            let status = if *errors == 0 { "success" } else { "partial" };
            serde_json::json!({
                "event": "complete",
                "status": status,
                "uploaded": uploaded,
                "warnings": warnings,
                "errors": errors,
            })
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(event_to_json(&event));
    }
}
