//! Structured logger that dispatches entries to a pluggable [`Sink`].
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::buffer::CaptureBuffer;
use super::entry::{Attributes, LogEntry, Severity};
use super::sink::{Sink, TracingSink};
use super::value::into_attributes;

/// Generate one message-only logging method per severity, delegating to
/// [`Logger::log`] with empty attributes.
macro_rules! severity_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Log a message at `", stringify!($method), "` severity.")]
            pub fn $method(&self, message: impl fmt::Display) {
                self.log(Severity::$variant, message, Value::Null);
            }
        )+
    };
}

/// Structured logger.
///
/// Accepts severity, message, attributes and an optional progname and hands
/// the resulting [`LogEntry`] to its sink. Loggers are cheap to clone; clones
/// share the sink, so a clone handed to a background thread writes into the
/// same destination.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    progname: Option<String>,
    level: Severity,
    tags: Attributes,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("progname", &self.progname)
            .field("level", &self.level)
            .field("tags", &self.tags)
            .field("capturing", &self.sink.capture_buffer().is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl Logger {
    /// Create a logger writing every severity to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            sink,
            progname: None,
            level: Severity::Debug,
            tags: Attributes::new(),
        }
    }

    /// Create a logger that records into `buffer`.
    #[must_use]
    pub fn capturing(buffer: CaptureBuffer) -> Self {
        Self::new(Arc::new(buffer))
    }

    /// Set the progname stamped on every entry.
    #[must_use]
    pub fn with_progname(mut self, progname: impl Into<String>) -> Self {
        self.progname = Some(progname.into());
        self
    }

    /// Drop entries below `level`.
    #[must_use]
    pub const fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Minimum severity written to the sink.
    #[must_use]
    pub const fn level(&self) -> Severity {
        self.level
    }

    /// Progname stamped on entries, if any.
    #[must_use]
    pub fn progname(&self) -> Option<&str> {
        self.progname.as_deref()
    }

    /// Context tags merged into every entry.
    #[must_use]
    pub const fn tags(&self) -> &Attributes {
        &self.tags
    }

    /// The capture buffer this logger writes into, if it is capturing.
    #[must_use]
    pub fn capture_buffer(&self) -> Option<CaptureBuffer> {
        self.sink.capture_buffer()
    }

    /// Return a logger sharing this sink whose entries also carry `tags`.
    ///
    /// Tags nest: keys from `tags` override this logger's tags, and an
    /// entry's own attributes override both.
    #[must_use]
    pub fn tagged(&self, tags: Attributes) -> Self {
        let mut merged = self.tags.clone();
        merged.extend(tags);
        Self {
            tags: merged,
            ..self.clone()
        }
    }

    /// Run `body` with a tagged sub-scope of this logger.
    pub fn tag<R>(&self, tags: Attributes, body: impl FnOnce(&Self) -> R) -> R {
        body(&self.tagged(tags))
    }

    /// Log a message with structured attributes.
    ///
    /// `attributes` is usually a JSON object (`serde_json::json!({..})`);
    /// `null` means no attributes.
    pub fn log(&self, severity: Severity, message: impl fmt::Display, attributes: Value) {
        if severity < self.level {
            return;
        }
        let mut entry = LogEntry::new(severity, message).with_attributes(into_attributes(attributes));
        entry.progname.clone_from(&self.progname);
        self.write_entry(&entry);
    }

    /// Forward an already formed entry, keeping its timestamp, severity,
    /// message and progname, and merging this logger's tags underneath its
    /// attributes.
    pub fn write_entry(&self, entry: &LogEntry) {
        if entry.severity < self.level {
            return;
        }
        self.sink.write(entry.tagged(&self.tags));
    }

    /// Replay every entry of `buffer` through this logger in capture order.
    pub fn replay(&self, buffer: &CaptureBuffer) {
        for entry in buffer.entries() {
            self.write_entry(&entry);
        }
    }

    severity_methods! {
        debug   => Debug,
        info    => Info,
        warn    => Warn,
        error   => Error,
        fatal   => Fatal,
        unknown => Unknown,
    }
}

impl Sink for Logger {
    fn write(&self, entry: LogEntry) {
        self.write_entry(&entry);
    }

    fn capture_buffer(&self) -> Option<CaptureBuffer> {
        self.sink.capture_buffer()
    }
}
