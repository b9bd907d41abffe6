//! The diagnostics sink that decode and mutation failures are reported to.
//!
//! A pool is handed a sink explicitly (see [`ObjectPool::with_diagnostics`]); the default,
//! [`LogDiagnostics`], forwards everything to the `log` facade.
//!
//! [`ObjectPool::with_diagnostics`]: crate::ObjectPool::with_diagnostics

use std::fmt;
use std::sync::{Mutex, PoisonError};

use log::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Receives `(severity, message)` pairs. Implementations must not fail or panic.
pub trait Diagnostics: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);
}

/// Forwards to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => debug!("{}", message),
            Severity::Info => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
            Severity::Critical => error!("CRITICAL: {}", message),
        }
    }
}

/// Keeps every emitted message in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<(Severity, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded messages at exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(s, _)| *s == severity)
            .count()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, severity: Severity, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, message.to_owned()));
    }
}
