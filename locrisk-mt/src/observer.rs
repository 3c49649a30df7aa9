//! Diagnostics sink for orchestration runs.
//!
//! The orchestrator and the HTTP backends report progress and problems
//! through a [`RunObserver`] handed to them explicitly. [`TracingObserver`]
//! forwards records to `tracing`; [`MemoryObserver`] keeps them for callers
//! that want to show or inspect them.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Target language the record is about, if any
    pub language: Option<String>,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, language: Option<&str>, message: impl Into<String>) -> Self {
        LogRecord {
            level,
            language: language.map(str::to_string),
            message: message.into(),
        }
    }
}

pub trait RunObserver: Send + Sync {
    fn record(&self, record: LogRecord);

    fn debug(&self, language: Option<&str>, message: String) {
        self.record(LogRecord::new(LogLevel::Debug, language, message));
    }

    fn info(&self, language: Option<&str>, message: String) {
        self.record(LogRecord::new(LogLevel::Info, language, message));
    }

    fn warn(&self, language: Option<&str>, message: String) {
        self.record(LogRecord::new(LogLevel::Warn, language, message));
    }

    fn error(&self, language: Option<&str>, message: String) {
        self.record(LogRecord::new(LogLevel::Error, language, message));
    }
}

/// Forwards records to the `tracing` subscriber installed by the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn record(&self, record: LogRecord) {
        let language = record.language.as_deref().unwrap_or("-");
        match record.level {
            LogLevel::Debug => tracing::debug!(language, "{}", record.message),
            LogLevel::Info => tracing::info!(language, "{}", record.message),
            LogLevel::Warn => tracing::warn!(language, "{}", record.message),
            LogLevel::Error => tracing::error!(language, "{}", record.message),
        }
    }
}

/// Keeps every record in arrival order
#[derive(Debug, Default)]
pub struct MemoryObserver {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Remove and return the records so far
    pub fn drain(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// A panic elsewhere while holding the lock must not lose diagnostics
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RunObserver for MemoryObserver {
    fn record(&self, record: LogRecord) {
        self.lock().push(record);
    }
}

impl<T: RunObserver + ?Sized> RunObserver for Arc<T> {
    fn record(&self, record: LogRecord) {
        (**self).record(record);
    }
}

/// Default observer for components constructed without one
pub fn tracing_observer() -> Arc<dyn RunObserver> {
    Arc::new(TracingObserver)
}
