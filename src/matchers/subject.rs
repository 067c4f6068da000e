//! What an expectation is evaluated against.
use std::fmt;

use crate::error::Error;
use crate::logging::{CaptureBuffer, Logger, current_buffer};

/// Something that exposes the capture buffer its logs went to.
pub trait Captured {
    /// The buffer to search, if any.
    fn captured_buffer(&self) -> Option<CaptureBuffer>;
}

impl Captured for CaptureBuffer {
    fn captured_buffer(&self) -> Option<CaptureBuffer> {
        Some(self.clone())
    }
}

impl Captured for Logger {
    fn captured_buffer(&self) -> Option<CaptureBuffer> {
        self.capture_buffer()
    }
}

/// A boxed deferred action. Errors it returns are passed through untouched.
pub type Action<'a> = Box<dyn FnOnce() -> anyhow::Result<()> + 'a>;

/// The subject of an expectation.
pub enum Subject<'a> {
    /// Inspect the buffer of an already populated value.
    Direct(&'a dyn Captured),
    /// Run the action first, then inspect the current thread's capture buffer.
    Deferred(Action<'a>),
}

impl<'a> Subject<'a> {
    /// Wrap an infallible action.
    pub fn deferred(action: impl FnOnce() + 'a) -> Self {
        Self::Deferred(Box::new(move || {
            action();
            Ok(())
        }))
    }

    /// Wrap a fallible action; its error is returned from evaluation as is.
    pub fn try_deferred(action: impl FnOnce() -> anyhow::Result<()> + 'a) -> Self {
        Self::Deferred(Box::new(action))
    }

    /// Run the deferred action, if any, and return the buffer to search.
    ///
    /// The action runs exactly once. A panic or error from the action
    /// propagates before any buffer is looked up.
    ///
    /// # Errors
    ///
    /// Returns the action's own error unchanged, or [`Error::NoActiveCapture`]
    /// if no capture buffer is reachable.
    pub fn resolve(self) -> anyhow::Result<CaptureBuffer> {
        let buffer = match self {
            Self::Direct(captured) => captured.captured_buffer(),
            Self::Deferred(action) => {
                action()?;
                current_buffer()
            }
        };
        buffer.ok_or_else(|| Error::NoActiveCapture.into())
    }
}

impl fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Subject::Direct"),
            Self::Deferred(_) => f.write_str("Subject::Deferred"),
        }
    }
}

impl<'a> From<&'a CaptureBuffer> for Subject<'a> {
    fn from(buffer: &'a CaptureBuffer) -> Self {
        Self::Direct(buffer)
    }
}

impl<'a> From<&'a Logger> for Subject<'a> {
    fn from(logger: &'a Logger) -> Self {
        Self::Direct(logger)
    }
}
