//! Log assertions: criteria, the `have_logged` matcher, negation and
//! `and`-composition.
//!
//! ```no_run
//! use logcheck::matchers::{Criteria, Matcher, Subject, expect, have_logged};
//! use logcheck::logging::{Severity, current_logger};
//!
//! # fn main() -> anyhow::Result<()> {
//! expect(Subject::deferred(|| current_logger().warn("Block log message")))
//!     .to(have_logged(Criteria::new().severity(Severity::Warn).message("Block log message")))?;
//! # Ok(())
//! # }
//! ```

mod compound;
mod criteria;
mod expect;
mod have_logged;
mod negated;
mod subject;

pub use compound::AllOf;
pub use criteria::{Criteria, TextMatch, entry_matches};
pub use expect::{Expect, expect};
pub use have_logged::{HaveLogged, have_logged};
pub use negated::Negated;
pub use subject::{Action, Captured, Subject};

use crate::logging::CaptureBuffer;

/// A log expectation.
///
/// Implementors decide whether a capture buffer satisfies them and describe
/// the outcome. [`evaluate`](Matcher::evaluate) handles both subject kinds:
/// a direct subject is searched as is, a deferred action is run exactly once
/// and the current thread's buffer is searched afterwards.
pub trait Matcher {
    /// Search `buffer` and record the outcome.
    fn matches_buffer(&mut self, buffer: &CaptureBuffer) -> bool;

    /// Human-readable description of what is expected.
    fn description(&self) -> String;

    /// Diagnostic for a failed positive expectation.
    fn failure_message(&self) -> String;

    /// Diagnostic for a failed negated expectation.
    fn failure_message_when_negated(&self) -> String;

    /// Evaluate against `subject`.
    ///
    /// # Errors
    ///
    /// Returns the deferred action's error unchanged, or
    /// [`Error::NoActiveCapture`](crate::Error::NoActiveCapture) if there is
    /// no buffer to search.
    fn evaluate(&mut self, subject: Subject<'_>) -> anyhow::Result<bool> {
        let buffer = subject.resolve()?;
        Ok(self.matches_buffer(&buffer))
    }

    /// Invert this matcher.
    fn not(self) -> Negated<Self>
    where
        Self: Sized,
    {
        Negated::new(self)
    }

    /// Require both this matcher and `other` to hold.
    ///
    /// Chains stay flat: `a.and(b).and(c)` and `a.and(b.and(c))` both hold
    /// three terms.
    fn and<M: Matcher + 'static>(self, other: M) -> AllOf
    where
        Self: Sized + 'static,
    {
        let mut all = AllOf::default();
        all.push(Box::new(self));
        all.push(Box::new(other));
        all
    }

    /// Hand over the terms of an `and` chain, leaving it empty.
    ///
    /// Returns `None` for matchers that are not a chain.
    fn take_terms(&mut self) -> Option<Vec<Box<dyn Matcher>>> {
        None
    }
}

impl std::fmt::Debug for dyn Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Matcher").field(&self.description()).finish()
    }
}
