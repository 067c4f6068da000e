//! `expect(subject).to(matcher)` assertion syntax.
use super::Matcher;
use super::subject::Subject;
use crate::error::Error;

/// Pending assertion on a subject. Created by [`expect`].
#[derive(Debug)]
#[must_use = "an expectation does nothing until `to` or `not_to` is called"]
pub struct Expect<'a> {
    subject: Subject<'a>,
}

/// Start an assertion on `subject`.
///
/// Accepts anything convertible into a [`Subject`]: a `&Logger`, a
/// `&CaptureBuffer`, a `&CaptureSession`, or a deferred action built with
/// [`Subject::deferred`].
pub fn expect<'a>(subject: impl Into<Subject<'a>>) -> Expect<'a> {
    Expect {
        subject: subject.into(),
    }
}

impl Expect<'_> {
    /// Assert that `matcher` holds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExpectationNotMet`] carrying the matcher's failure
    /// message, a usage error, or the deferred action's own error unchanged.
    pub fn to<M: Matcher>(self, mut matcher: M) -> anyhow::Result<()> {
        if matcher.evaluate(self.subject)? {
            Ok(())
        } else {
            Err(Error::ExpectationNotMet(matcher.failure_message()).into())
        }
    }

    /// Assert that `matcher` does not hold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExpectationNotMet`] carrying the matcher's negated
    /// failure message, a usage error, or the deferred action's own error
    /// unchanged.
    pub fn not_to<M: Matcher>(self, matcher: M) -> anyhow::Result<()> {
        self.to(matcher.not())
    }
}
