//! Error types for log capture and log assertions.
//!
//! Usage errors (a session started twice, a malformed pattern, an
//! expectation evaluated with no capture in place) are reported as
//! [`Error`] values built with [`thiserror`]. The user-facing entry points
//! ([`Matcher::evaluate`](crate::matchers::Matcher::evaluate),
//! [`Expect::to`](crate::matchers::Expect::to)) return [`anyhow::Result`] so
//! that errors raised by a deferred action reach the caller untouched.
//!
//! # Error hierarchy
//!
//! ```text
//! Error
//! ├── SessionAlreadyStarted / SessionNotActive / SessionCompleted
//! ├── NoActiveCapture      : nothing to search
//! ├── InvalidPattern       : regex failed to compile
//! ├── InvalidAttributes    : attribute criteria not a JSON object
//! ├── UnknownSeverity      : severity name not recognised
//! └── ExpectationNotMet    : assertion failure with diagnostic text
//! ```

use thiserror::Error;

/// Errors reported by the capture and matching machinery.
#[derive(Error, Debug)]
pub enum Error {
    /// [`CaptureSession::start`](crate::session::CaptureSession::start) was
    /// called on a session that is already active.
    #[error("capture session already started")]
    SessionAlreadyStarted,

    /// [`CaptureSession::end`](crate::session::CaptureSession::end) was called
    /// on a session that was never started.
    #[error("capture session is not active")]
    SessionNotActive,

    /// The session already ran to completion and cannot be reused.
    #[error("capture session already completed")]
    SessionCompleted,

    /// An expectation was evaluated but no capture buffer was reachable
    /// from the subject or the current logger.
    #[error("no capture buffer is active on this thread")]
    NoActiveCapture,

    /// A message or progname pattern did not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern text as supplied.
        pattern: String,
        /// Underlying regex compilation error.
        source: regex::Error,
    },

    /// Attribute criteria were given as something other than a JSON object.
    #[error("attribute criteria must be a JSON object, got {0}")]
    InvalidAttributes(String),

    /// A severity name could not be parsed.
    #[error("unknown severity '{0}': must be one of debug, info, warn, error, fatal, unknown")]
    UnknownSeverity(String),

    /// An expectation was not met; carries the matcher's failure message.
    #[error("{0}")]
    ExpectationNotMet(String),
}
