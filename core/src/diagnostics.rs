// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured diagnostics for hosts that collect rejected input
//!
//! Regular logging goes through `tracing`. Diagnostics are the records a host
//! may want to keep or show (rejected selections and similar), tagged with
//! the match they came from.

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One diagnostic record
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// ISO 8601 timestamp
    pub timestamp: String,
    pub level: Level,
    /// Emitting component
    pub component: String,
    pub message: String,
    /// Match the record belongs to
    pub match_id: String,
    /// Additional context fields
    #[serde(flatten)]
    pub fields: serde_json::Value,
}

impl Diagnostic {
    pub fn new(level: Level, component: &str, message: &str, match_id: Uuid) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            component: component.to_string(),
            message: message.to_string(),
            match_id: match_id.simple().to_string(),
            fields: serde_json::json!({}),
        }
    }

    /// Add additional context fields
    pub fn with_fields(mut self, fields: serde_json::Value) -> Self {
        self.fields = fields;
        self
    }
}

/// Destination for diagnostics
pub trait DiagnosticSink {
    fn record(&self, entry: Diagnostic);
}

/// Writes each record as a single JSON line on stdout
pub struct JsonSink;

impl DiagnosticSink for JsonSink {
    fn record(&self, entry: Diagnostic) {
        if let Ok(json) = serde_json::to_string(&entry) {
            println!("{}", json);
        }
    }
}

/// Discards everything
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _entry: Diagnostic) {}
}

/// Keeps records in memory
#[derive(Default)]
pub struct RecordingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, entry: Diagnostic) {
        self.entries.borrow_mut().push(entry);
    }
}

/// Sink bound to a match id and component name
#[derive(Clone)]
pub struct Reporter {
    sink: Rc<dyn DiagnosticSink>,
    match_id: Uuid,
    component: String,
}

impl Reporter {
    pub fn new(sink: Rc<dyn DiagnosticSink>, match_id: Uuid, component: &str) -> Self {
        Self {
            sink,
            match_id,
            component: component.to_string(),
        }
    }

    pub fn match_id(&self) -> Uuid {
        self.match_id
    }

    pub fn report(&self, level: Level, message: &str, fields: serde_json::Value) {
        let entry = Diagnostic::new(level, &self.component, message, self.match_id)
            .with_fields(fields);
        self.sink.record(entry);
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Rc::new(NullSink), Uuid::new_v4(), "selection")
    }
}
