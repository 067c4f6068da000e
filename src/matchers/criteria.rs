//! Match criteria and the per-entry predicate.
use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::error::Error;
use crate::logging::value::is_subset;
use crate::logging::{Attributes, LogEntry, Severity};

/// Expected text: exact equality or a regular expression search.
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// The text must equal this string.
    Exact(String),
    /// The text must contain a match for this pattern.
    Pattern(Regex),
}

impl TextMatch {
    /// Compile `pattern` into a [`TextMatch::Pattern`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, Error> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Return `true` if `text` satisfies this expectation.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == text,
            Self::Pattern(regex) => regex.is_match(text),
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{text:?}"),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        Self::Exact(text.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(text: String) -> Self {
        Self::Exact(text)
    }
}

impl From<Regex> for TextMatch {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// The set of conditions a log entry must satisfy.
///
/// Every supplied condition must hold; absent conditions are ignored, so an
/// empty set matches every entry.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    severity: Option<Severity>,
    message: Option<TextMatch>,
    progname: Option<TextMatch>,
    attributes: Option<Attributes>,
}

impl Criteria {
    /// Create an empty criteria set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require this exact severity.
    #[must_use]
    pub const fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Require the message to equal a string or match a [`Regex`].
    #[must_use]
    pub fn message(mut self, message: impl Into<TextMatch>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Require the message to match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern does not compile.
    pub fn message_matching(self, pattern: &str) -> Result<Self, Error> {
        Ok(self.message(TextMatch::pattern(pattern)?))
    }

    /// Require the progname to equal a string or match a [`Regex`].
    #[must_use]
    pub fn progname(mut self, progname: impl Into<TextMatch>) -> Self {
        self.progname = Some(progname.into());
        self
    }

    /// Require the progname to match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern does not compile.
    pub fn progname_matching(self, pattern: &str) -> Result<Self, Error> {
        Ok(self.progname(TextMatch::pattern(pattern)?))
    }

    /// Require these attributes (a JSON object) to be present with equal
    /// values. Extra attributes on the entry are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttributes`] if `attributes` is not an object.
    pub fn attributes(mut self, attributes: Value) -> Result<Self, Error> {
        let Value::Object(map) = attributes else {
            return Err(Error::InvalidAttributes(attributes.to_string()));
        };
        self.attributes.get_or_insert_with(Attributes::new).extend(map);
        Ok(self)
    }

    /// Require a single attribute to be present with an equal value.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    /// Return `true` if no condition has been supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.severity.is_none()
            && self.message.is_none()
            && self.progname.is_none()
            && self.attributes.is_none()
    }

    /// Return `true` if `entry` satisfies every supplied condition.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        entry_matches(entry, self)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(severity) = self.severity {
            parts.push(format!("severity={severity}"));
        }
        if let Some(message) = &self.message {
            parts.push(format!("message={message}"));
        }
        if let Some(progname) = &self.progname {
            parts.push(format!("progname={progname}"));
        }
        if let Some(attributes) = &self.attributes {
            parts.push(format!("attributes={}", Value::Object(attributes.clone())));
        }
        if parts.is_empty() {
            f.write_str("any entry")
        } else {
            write!(f, "an entry with {}", parts.join(" and "))
        }
    }
}

/// Return `true` if `entry` satisfies every condition in `criteria`.
///
/// Severity is compared exactly, message and progname by equality or
/// pattern, and attributes as a subset. An entry without a progname never
/// satisfies a progname condition.
#[must_use]
pub fn entry_matches(entry: &LogEntry, criteria: &Criteria) -> bool {
    if criteria.severity.is_some_and(|s| s != entry.severity) {
        return false;
    }
    if let Some(message) = &criteria.message
        && !message.is_match(&entry.message)
    {
        return false;
    }
    if let Some(progname) = &criteria.progname
        && !entry
            .progname
            .as_deref()
            .is_some_and(|actual| progname.is_match(actual))
    {
        return false;
    }
    criteria
        .attributes
        .as_ref()
        .is_none_or(|expected| is_subset(expected, &entry.attributes))
}
