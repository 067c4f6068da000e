// Shared helpers for integration tests.
//
// Provides an observable "original" logger and a diagnostics writer the test
// can read back, so session behaviour (restore, report, replay) can be
// checked without touching stderr or a global subscriber.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use logcheck::config::CaptureConfig;
use logcheck::logging::{CaptureBuffer, Logger, LoggerGuard, set_default};
use logcheck::session::{CaptureSession, TestInfo};

/// In-memory diagnostic stream shared between the session and the test.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Arc<Mutex<Vec<u8>>>);

impl Diagnostics {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for Diagnostics {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session whose original logger captures into `original`, so anything
/// replayed at the end of the session can be inspected.
///
/// Field order matters: the session drops before the guard that installed
/// the original logger.
#[derive(Debug)]
pub struct Observed {
    /// Session under test, not yet started.
    pub session: CaptureSession,
    /// Failure reports written by the session.
    pub diagnostics: Diagnostics,
    /// Buffer behind the original logger; receives replayed entries.
    pub original: CaptureBuffer,
    _guard: LoggerGuard,
}

/// Build an [`Observed`] session with default settings.
pub fn observed(name: &str) -> Observed {
    observed_with(name, CaptureConfig::default())
}

/// Build an [`Observed`] session with `config`.
pub fn observed_with(name: &str, config: CaptureConfig) -> Observed {
    let original = CaptureBuffer::new();
    let guard = set_default(Logger::capturing(original.clone()).with_progname("original"));
    let diagnostics = Diagnostics::default();
    let session = CaptureSession::new(TestInfo::new(name, "tests/session.rs:1"))
        .with_config(config)
        .with_diagnostics(diagnostics.clone());
    Observed {
        session,
        diagnostics,
        original,
        _guard: guard,
    }
}

/// A logger capturing into a fresh buffer, returned alongside the buffer.
pub fn capturing_logger() -> (Logger, CaptureBuffer) {
    let buffer = CaptureBuffer::new();
    (Logger::capturing(buffer.clone()), buffer)
}
