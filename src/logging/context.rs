//! The "current logger" slot.
//!
//! Code under test asks [`current_logger`] for the logger to write to. A
//! process default (writing to `tracing`) backs the slot; a
//! [`CaptureSession`](crate::session::CaptureSession) overrides it for the
//! current thread with [`set_default`] and the returned [`LoggerGuard`]
//! restores the previous logger when dropped, including during unwinding.
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::{OnceLock, PoisonError, RwLock};

use super::buffer::CaptureBuffer;
use super::logger::Logger;

thread_local! {
    /// Per-thread override installed by [`set_default`].
    static CURRENT: RefCell<Option<Logger>> = const { RefCell::new(None) };
}

static GLOBAL: OnceLock<RwLock<Logger>> = OnceLock::new();

fn global() -> &'static RwLock<Logger> {
    GLOBAL.get_or_init(|| RwLock::new(Logger::default()))
}

/// Return the logger in effect on this thread.
///
/// This is the innermost override set with [`set_default`], or the process
/// default when no override is active.
#[must_use]
pub fn current_logger() -> Logger {
    CURRENT
        .with(|cell| cell.borrow().clone())
        .unwrap_or_else(|| {
            global()
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
}

/// Return the capture buffer of the current logger, if it is capturing.
#[must_use]
pub fn current_buffer() -> Option<CaptureBuffer> {
    current_logger().capture_buffer()
}

/// Replace the process default logger, returning the previous one.
///
/// Intended for program start-up; tests should use [`set_default`].
pub fn set_global_logger(logger: Logger) -> Logger {
    let mut slot = global().write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, logger)
}

/// Override the current logger on this thread until the guard is dropped.
#[must_use = "dropping the guard immediately restores the previous logger"]
pub fn set_default(logger: Logger) -> LoggerGuard {
    let previous = CURRENT.with(|cell| cell.borrow_mut().replace(logger));
    LoggerGuard {
        previous,
        _not_send: PhantomData,
    }
}

/// Run `body` with `logger` installed as the current logger.
pub fn with_logger<R>(logger: Logger, body: impl FnOnce() -> R) -> R {
    let _guard = set_default(logger);
    body()
}

/// Restores the previously current logger when dropped.
///
/// The guard is tied to the thread that created it.
#[derive(Debug)]
pub struct LoggerGuard {
    previous: Option<Logger>,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // `try_with` tolerates guards dropped during thread-local teardown.
        let _ = CURRENT.try_with(|cell| *cell.borrow_mut() = previous);
    }
}
