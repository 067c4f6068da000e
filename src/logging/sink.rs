//! The [`Sink`] abstraction and the default sink that writes to `tracing`.
use serde_json::Value;

use super::buffer::CaptureBuffer;
use super::entry::{LogEntry, Severity};

/// Destination for fully formed log entries.
///
/// Both [`CaptureBuffer`] (in-memory capture) and [`TracingSink`] (real
/// output through the process's `tracing` subscriber) implement this trait,
/// so a [`Logger`](super::Logger) can write without knowing where its
/// entries end up.
#[cfg_attr(test, mockall::automock)]
pub trait Sink: Send + Sync {
    /// Accept one log entry.
    fn write(&self, entry: LogEntry);

    /// The capture buffer behind this sink, if it records entries in memory.
    fn capture_buffer(&self) -> Option<CaptureBuffer> {
        None
    }
}

/// Sink that re-emits entries as `tracing` events under the `logcheck` target.
///
/// The entry's severity, progname and attributes travel as event fields so
/// a subscriber (or a [`CaptureLayer`](super::CaptureLayer)) can recover
/// them. Fatal and unknown entries are emitted at `ERROR` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&self, entry: LogEntry) {
        let severity = entry.severity.as_str();
        let progname = entry.progname.as_deref().unwrap_or_default();
        let attributes = Value::Object(entry.attributes).to_string();
        let timestamp = entry.timestamp.to_rfc3339();
        let message = entry.message;
        match entry.severity {
            Severity::Debug => tracing::debug!(
                target: "logcheck",
                severity, progname, attributes = %attributes, timestamp = %timestamp,
                "{message}"
            ),
            Severity::Info => tracing::info!(
                target: "logcheck",
                severity, progname, attributes = %attributes, timestamp = %timestamp,
                "{message}"
            ),
            Severity::Warn => tracing::warn!(
                target: "logcheck",
                severity, progname, attributes = %attributes, timestamp = %timestamp,
                "{message}"
            ),
            Severity::Error | Severity::Fatal | Severity::Unknown => tracing::error!(
                target: "logcheck",
                severity, progname, attributes = %attributes, timestamp = %timestamp,
                "{message}"
            ),
        }
    }
}
