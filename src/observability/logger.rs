//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` and `severity` first, remaining keys sorted
//! - Synchronous, no buffering
//! - Written to stderr so command output on stdout stays parseable

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::Value;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Parses a configured level name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(Severity::Trace),
            "info" => Some(Severity::Info),
            "warn" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            "fatal" => Some(Severity::Fatal),
            _ => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// Writes one JSON object per line to stderr.
pub struct Logger;

impl Logger {
    /// Sets the lowest severity that is written; lower events are dropped.
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < Self::min_severity() {
            return;
        }
        let line = format_line(severity, event, fields);
        let mut stderr = io::stderr().lock();
        // Best effort
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Renders one log line, newline included.
fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let mut line = format!(
        "{{\"event\":{},\"severity\":\"{}\"",
        quote(event),
        severity.as_str()
    );
    for (key, value) in sorted {
        line.push(',');
        line.push_str(&quote(key));
        line.push(':');
        line.push_str(&quote(value));
    }
    line.push_str("}\n");
    line
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
