//! Diagnostic sinks the calculator reports to.

use crate::domain::ports::{DiagnosticLevel, DiagnosticSink};
use std::sync::Mutex;

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, level: DiagnosticLevel, message: &str) {
        match level {
            DiagnosticLevel::Debug => tracing::debug!("{}", message),
            DiagnosticLevel::Info => tracing::info!("{}", message),
            DiagnosticLevel::Warning => tracing::warn!("⚠️ {}", message),
            DiagnosticLevel::Error => tracing::error!("❌ {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .map(|d| d.message)
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, level: DiagnosticLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Diagnostic {
                level,
                message: message.to_string(),
            });
        }
    }
}
