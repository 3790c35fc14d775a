//! Diagnostic reporting for recoverable plan degradations.
//!
//! The engines never fail on malformed plan content; they substitute a
//! documented fallback and report what happened through a sink supplied by
//! the caller. Production callers pass [`TracingSink`]; tests pass
//! [`MemorySink`] and assert on the recorded messages.

use std::sync::Mutex;

/// Receives non-fatal degradation reports from a pipeline run.
pub trait DiagnosticSink {
    fn report(&self, stage: &str, message: &str);
}

/// Forwards diagnostics to `tracing::warn!`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, stage: &str, message: &str) {
        tracing::warn!(stage, "{message}");
    }
}

/// Records diagnostics in memory for inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, stage: &str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("{stage}: {message}"));
    }
}
