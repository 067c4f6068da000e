//! Tracing integration: the capture layer, the console formatter, and
//! subscriber initialisation.
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::buffer::CaptureBuffer;
use super::entry::{Attributes, LogEntry, Severity};

/// Target used by this crate's own diagnostics; never captured.
pub(crate) const INTERNAL_TARGET: &str = "logcheck::session";

/// Collects the fields of a [`tracing::Event`] into a [`LogEntry`].
///
/// `message`, `severity`, `progname`, `timestamp` and `attributes` are
/// recognised; every other field becomes an attribute.
#[derive(Default)]
struct EntryVisitor {
    message: String,
    severity: Option<Severity>,
    progname: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    attributes: Attributes,
}

impl EntryVisitor {
    fn record_value(&mut self, field: &tracing::field::Field, value: Value) {
        self.attributes.insert(field.name().to_string(), value);
    }

    fn record_text(&mut self, field: &tracing::field::Field, text: String) {
        match field.name() {
            "message" => self.message = text,
            "severity" => match text.parse() {
                Ok(severity) => self.severity = Some(severity),
                Err(_) => self.record_value(field, Value::String(text)),
            },
            "progname" => {
                if !text.is_empty() {
                    self.progname = Some(text);
                }
            }
            "timestamp" => match DateTime::parse_from_rfc3339(&text) {
                Ok(ts) => self.timestamp = Some(ts.with_timezone(&Utc)),
                Err(_) => self.record_value(field, Value::String(text)),
            },
            "attributes" => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => self.attributes.extend(map),
                _ => self.record_value(field, Value::String(text)),
            },
            _ => self.record_value(field, Value::String(text)),
        }
    }

    fn into_entry(self, metadata: &tracing::Metadata<'_>) -> LogEntry {
        LogEntry {
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            severity: self
                .severity
                .unwrap_or_else(|| Severity::from(*metadata.level())),
            message: self.message,
            progname: self
                .progname
                .or_else(|| Some(metadata.target().to_string())),
            attributes: self.attributes,
        }
    }
}

impl tracing::field::Visit for EntryVisitor {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.record_value(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.record_value(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.record_value(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.record_value(field, Value::from(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.record_text(field, format!("{value:?}"));
    }
}

/// A [`tracing_subscriber::Layer`] that records every event into a
/// [`CaptureBuffer`].
///
/// Installed by [`CaptureSession`](crate::session::CaptureSession) so that
/// code logging through `tracing` macros is captured alongside code using a
/// [`Logger`](super::Logger).
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    buffer: CaptureBuffer,
    level: Severity,
}

impl CaptureLayer {
    /// Create a layer appending every event to `buffer`.
    #[must_use]
    pub const fn new(buffer: CaptureBuffer) -> Self {
        Self {
            buffer,
            level: Severity::Debug,
        }
    }

    /// Skip events whose severity is below `level`.
    ///
    /// The severity is taken after the `severity` field override, so an
    /// `error!` event carrying `severity = "fatal"` passes a `fatal` threshold.
    #[must_use]
    pub const fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// The buffer this layer appends to.
    #[must_use]
    pub const fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        if metadata.target() == INTERNAL_TARGET {
            return;
        }
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        let entry = visitor.into_entry(metadata);
        if entry.severity >= self.level {
            self.buffer.append(entry);
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that renders events as
/// `SEVERITY [progname] message {attributes}`.
struct EntryFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for EntryFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        let entry = visitor.into_entry(event.metadata());
        let colour = match entry.severity {
            _ if !writer.has_ansi_escapes() => "",
            Severity::Debug => "\x1b[2m",
            Severity::Info => "",
            Severity::Warn => "\x1b[33m",
            Severity::Error | Severity::Fatal | Severity::Unknown => "\x1b[31m",
        };
        let reset = if colour.is_empty() { "" } else { "\x1b[0m" };
        write!(writer, "{colour}{:<5}{reset} ", entry.severity.label())?;
        if let Some(progname) = &entry.progname {
            write!(writer, "[{progname}] ")?;
        }
        write!(writer, "{}", entry.message)?;
        if !entry.attributes.is_empty() {
            write!(writer, " {}", Value::Object(entry.attributes))?;
        }
        writeln!(writer)
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Installs a console layer on stderr using the entry formatter, filtered
/// by `RUST_LOG` when set, otherwise at `INFO` (or `DEBUG` when `verbose`).
/// Replayed entries from failed tests reach the console through this
/// subscriber. Does nothing if a global subscriber is already set.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::{
        EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer()
        .event_format(EntryFormatter)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .try_init();
}
