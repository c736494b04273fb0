//! JSONL diagnostics: one self-contained JSON object per line.
//!
//! Lines are assembled in memory and written with a single `write_all`, so a
//! tailing reader never sees a partial line. The file writer degrades instead
//! of failing:
//! 1. Primary file path
//! 2. stderr with `[MFEED-JSONL]` prefix
//! 3. Silent discard (rendering must never fail because logging did)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FeedError, Result};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Same label as the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// Diagnostic event types emitted by a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    RenderStart,
    RenderComplete,
    FeedEmpty,
    FetchFailed,
}

impl EventType {
    /// Same label as the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RenderStart => "render_start",
            Self::RenderComplete => "render_complete",
            Self::FeedEmpty => "feed_empty",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

/// A single diagnostic line — all fields optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Feed URL or path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Number of rendered lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// MF error code when something failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            source: None,
            count: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_error(mut self, code: &str, message: impl Into<String>) -> Self {
        self.error_code = Some(code.to_string());
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Single-line human rendering, used by the stderr sink.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!("{} {}", self.severity.label(), self.event.label());
        if let Some(source) = &self.source {
            line.push_str(&format!(" source={source}"));
        }
        if let Some(count) = self.count {
            line.push_str(&format!(" count={count}"));
        }
        if let (Some(code), Some(message)) = (&self.error_code, &self.error_message) {
            // Error displays usually lead with their own code.
            if message.starts_with(&format!("[{code}]")) {
                line.push_str(&format!(" {message}"));
            } else {
                line.push_str(&format!(" [{code}] {message}"));
            }
        }
        if let Some(details) = &self.details {
            line.push_str(&format!(" ({details})"));
        }
        line
    }
}

/// Where render diagnostics go.
pub trait DiagnosticSink {
    fn record(&mut self, entry: &LogEntry);
}

/// Degradation state of the JSONL writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

/// Append-only JSONL diagnostics file.
pub struct JsonlSink {
    writer: Option<BufWriter<File>>,
    state: WriterState,
    lines_written: u64,
}

impl JsonlSink {
    /// Open (or create) the log file, degrading to stderr when that fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match open_append(&path) {
            Ok(file) => Self {
                writer: Some(BufWriter::new(file)),
                state: WriterState::Normal,
                lines_written: 0,
            },
            Err(error) => {
                let _ = writeln!(
                    io::stderr(),
                    "[MFEED-JSONL] cannot open {}, using stderr: {error}",
                    path.display()
                );
                Self {
                    writer: None,
                    state: WriterState::Stderr,
                    lines_written: 0,
                }
            }
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    pub const fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut()
            && w.flush().is_err()
        {
            self.degrade();
        }
    }

    fn write_line(&mut self, line: &str) {
        match self.state {
            WriterState::Normal => {
                let ok = self
                    .writer
                    .as_mut()
                    .is_some_and(|w| w.write_all(line.as_bytes()).is_ok());
                if ok {
                    self.lines_written += 1;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                if write!(io::stderr(), "[MFEED-JSONL] {line}").is_err() {
                    self.degrade();
                }
            }
            WriterState::Discard => {}
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        self.state = match self.state {
            WriterState::Normal => WriterState::Stderr,
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }
}

impl DiagnosticSink for JsonlSink {
    fn record(&mut self, entry: &LogEntry) {
        match serde_json::to_string(entry) {
            Ok(json) => {
                self.write_line(&format!("{json}\n"));
                self.flush();
            }
            Err(e) => {
                let _ = writeln!(io::stderr(), "[MFEED-JSONL] serialize error: {e}");
            }
        }
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }
}

/// Console-style diagnostics on stderr.
#[derive(Debug)]
pub struct StderrSink {
    /// Entries below this severity are dropped.
    pub min_severity: Severity,
}

impl Default for StderrSink {
    fn default() -> Self {
        Self {
            min_severity: Severity::Info,
        }
    }
}

impl DiagnosticSink for StderrSink {
    fn record(&mut self, entry: &LogEntry) {
        if entry.severity < self.min_severity {
            return;
        }
        let _ = writeln!(io::stderr(), "mfeed: {}", entry.summary());
    }
}

/// In-memory capture.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub entries: Vec<LogEntry>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<EventType> {
        self.entries.iter().map(|entry| entry.event).collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&mut self, entry: &LogEntry) {
        self.entries.push(entry.clone());
    }
}

/// Fan one entry out to several sinks.
#[derive(Default)]
pub struct TeeSink {
    sinks: Vec<Box<dyn DiagnosticSink>>,
}

impl TeeSink {
    #[must_use]
    pub fn with(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl DiagnosticSink for TeeSink {
    fn record(&mut self, entry: &LogEntry) {
        for sink in &mut self.sinks {
            sink.record(entry);
        }
    }
}

// ──────────────────────── helpers ────────────────────────

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| FeedError::io(parent, source))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| FeedError::io(path, source))
}

/// Format current UTC time as ISO 8601.
fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
