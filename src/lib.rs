//! In-memory log capture and log assertions for tests.
//!
//! Code under test logs through the thread's current [`logging::Logger`]
//! (or through `tracing` macros). A [`session::CaptureSession`] redirects
//! both into a [`logging::CaptureBuffer`] for one test; matchers then assert
//! on what was captured, and a failing test gets its captured logs reported
//! and replayed into the real log stream.
//!
//! The public API is organised into four layers:
//!
//! - **[`logging`]**: entries, the logger, sinks, and the capture buffer
//! - **[`matchers`]**: `have_logged` criteria, negation, `and`-chains, `expect`
//! - **[`session`]**: per-test capture with replay on failure
//! - **[`config`]**: capture settings loaded from TOML
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod config;
pub mod error;
pub mod logging;
pub mod matchers;
pub mod session;

pub use error::Error;

/// Common imports for tests using this crate.
pub mod prelude {
    pub use crate::config::CaptureConfig;
    pub use crate::logging::{CaptureBuffer, Logger, Severity, current_logger, set_default};
    pub use crate::matchers::{Criteria, Matcher, Subject, expect, have_logged};
    pub use crate::session::{CaptureSession, TestInfo, TestOutcome, around_each};
    pub use crate::test_info;
}
