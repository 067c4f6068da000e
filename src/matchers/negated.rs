//! Logical inversion of a matcher.
use super::Matcher;
use crate::logging::CaptureBuffer;

/// Holds when the wrapped matcher does not.
///
/// Built with [`Matcher::not`].
#[derive(Debug, Clone)]
pub struct Negated<M> {
    inner: M,
}

impl<M: Matcher> Negated<M> {
    /// Wrap `inner`.
    pub const fn new(inner: M) -> Self {
        Self { inner }
    }

    /// The wrapped matcher.
    pub const fn inner(&self) -> &M {
        &self.inner
    }

    /// Unwrap the inner matcher.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: Matcher> Matcher for Negated<M> {
    fn matches_buffer(&mut self, buffer: &CaptureBuffer) -> bool {
        !self.inner.matches_buffer(buffer)
    }

    fn description(&self) -> String {
        format!("not {}", self.inner.description())
    }

    fn failure_message(&self) -> String {
        self.inner.failure_message_when_negated()
    }

    fn failure_message_when_negated(&self) -> String {
        self.inner.failure_message()
    }
}
