//! Log records as seen by sinks.

use std::fmt::Write as FmtWrite;

use chrono::{DateTime, Local};
use tracing::field::{Field, Visit};
use tracing::Event;

use crate::context::{Environment, LogId};
use crate::engine::level::Level;

/// Field carrying the four-letter level tag.
pub const FIELD_SEVERITY: &str = "severity";
/// Field carrying the flow's log id.
pub const FIELD_LOG_ID: &str = "log_id";
/// Field carrying the flow's environment tag.
pub const FIELD_ENV: &str = "env";

/// One record, handed to every sink whose level set accepts it.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub log_id: Option<LogId>,
    pub environment: Option<Environment>,
    pub target: String,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            log_id: None,
            environment: None,
            target: crate::TARGET.to_string(),
        }
    }

    /// Build a record from a tracing event.
    ///
    /// Events that do not come from the facade (plain `tracing` macros
    /// routed through the engine's dispatch) take their level from the
    /// event metadata.
    pub fn from_event(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let level = visitor
            .severity
            .as_deref()
            .and_then(Level::from_tag)
            .unwrap_or_else(|| Level::from_tracing(metadata.level()));

        Self {
            timestamp: Local::now(),
            level,
            message: visitor.message.unwrap_or_default(),
            log_id: visitor.log_id.as_deref().and_then(LogId::parse),
            environment: visitor.env.as_deref().and_then(|e| e.parse().ok()),
            target: metadata.target().to_string(),
        }
    }
}

/// Visitor that extracts the facade's fields from an event.
#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    severity: Option<String>,
    log_id: Option<String>,
    env: Option<String>,
}

impl RecordVisitor {
    fn slot(&mut self, field: &Field) -> Option<&mut Option<String>> {
        match field.name() {
            "message" => Some(&mut self.message),
            FIELD_SEVERITY => Some(&mut self.severity),
            FIELD_LOG_ID => Some(&mut self.log_id),
            FIELD_ENV => Some(&mut self.env),
            _ => None,
        }
    }
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if let Some(slot) = self.slot(field) {
            let mut buf = String::new();
            let _ = write!(&mut buf, "{:?}", value);
            *slot = Some(buf);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if let Some(slot) = self.slot(field) {
            *slot = Some(value.to_string());
        }
    }
}
