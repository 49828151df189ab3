//! Log sink boundary: formatted records with a severity level.
//!
//! The engine only formats text and hands it over; transport, filtering and
//! persistence belong to the sink implementation.

use std::sync::Mutex;

/// Severity of an emitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Destination for formatted log records.
pub trait LogSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);
}

/// Default sink forwarding records to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(target: "calltrace", "{message}"),
            Severity::Error => tracing::error!(target: "calltrace", "{message}"),
        }
    }
}

/// Sink collecting records in memory, for tests and assertions on emitted
/// log lines.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records emitted so far, in order.
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().expect("sink lock poisoned").clone()
    }

    /// Info-level messages only, in order.
    pub fn infos(&self) -> Vec<String> {
        self.messages_at(Severity::Info)
    }

    /// Error-level messages only, in order.
    pub fn errors(&self) -> Vec<String> {
        self.messages_at(Severity::Error)
    }

    fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, severity: Severity, message: &str) {
        self.records
            .lock()
            .expect("sink lock poisoned")
            .push((severity, message.to_string()));
    }
}
