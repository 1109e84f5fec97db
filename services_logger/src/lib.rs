//! # Logger Service
//!
//! This crate implements the console sink for the `log` facade.
//!
//! ## Philosophy
//!
//! Every record is turned into a structured [`LogEntry`] first and only
//! then rendered, so the format is testable without capturing stderr.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: Level,
    /// Module that emitted the record
    pub target: String,
    /// Log message
    pub message: String,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            target: target.into(),
            message: message.into(),
        }
    }

    /// Captures a `log` record
    pub fn from_record(record: &Record<'_>) -> Self {
        Self::new(record.level(), record.target(), record.args().to_string())
    }

    /// Renders the entry as one console line
    pub fn render(&self) -> String {
        format!("{:<5} {}: {}", self.level, short_target(&self.target), self.message)
    }
}

/// Keeps the crate name and drops the module path
fn short_target(target: &str) -> &str {
    target.split("::").next().unwrap_or(target)
}

/// Writes records to stderr
#[derive(Debug)]
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Installs the logger as the global `log` sink
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = LogEntry::from_record(record).render();
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
