//! Core logging types: severity, attributes, and the captured [`LogEntry`].
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Structured attributes attached to a log entry.
///
/// Keys keep their insertion order for display and replay; matching ignores
/// order.
pub type Attributes = serde_json::Map<String, Value>;

/// Severity of a log entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Diagnostic detail.
    Debug,
    /// Normal operational message.
    Info,
    /// Something unexpected that did not stop the operation.
    Warn,
    /// An operation failed.
    Error,
    /// The process cannot continue.
    Fatal,
    /// Severity could not be determined.
    Unknown,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Self; 6] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::Unknown,
    ];

    /// Lowercase name, as used in criteria descriptions and config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Unknown => "unknown",
        }
    }

    /// Uppercase label used when rendering entries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Unknown => "ANY",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "unknown" | "any" => Ok(Self::Unknown),
            _ => Err(Error::UnknownSeverity(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// One emitted log line.
///
/// Entries are never mutated once captured; replay works on copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Instant of emission.
    pub timestamp: DateTime<Utc>,
    /// Severity level.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// Name of the emitting component, if any.
    pub progname: Option<String>,
    /// Structured attributes.
    pub attributes: Attributes,
}

impl LogEntry {
    /// Create an entry stamped with the current time and no attributes.
    #[must_use]
    pub fn new(severity: Severity, message: impl fmt::Display) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            message: message.to_string(),
            progname: None,
            attributes: Attributes::new(),
        }
    }

    /// Set the progname.
    #[must_use]
    pub fn with_progname(mut self, progname: impl Into<String>) -> Self {
        self.progname = Some(progname.into());
        self
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Return a copy with `tags` merged underneath this entry's attributes.
    ///
    /// Keys already present on the entry keep their value.
    #[must_use]
    pub fn tagged(&self, tags: &Attributes) -> Self {
        if tags.is_empty() {
            return self.clone();
        }
        let mut attributes = tags.clone();
        for (key, value) in &self.attributes {
            attributes.insert(key.clone(), value.clone());
        }
        Self {
            attributes,
            ..self.clone()
        }
    }

    /// Render the entry without its timestamp, for failure diagnostics.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!("{:<5} ", self.severity.label());
        if let Some(progname) = &self.progname {
            line.push_str(&format!("({progname}) "));
        }
        line.push_str(&self.message);
        if !self.attributes.is_empty() {
            line.push(' ');
            line.push_str(&Value::Object(self.attributes.clone()).to_string());
        }
        line
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
            self.summary()
        )
    }
}
