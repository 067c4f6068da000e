//! Per-test capture sessions.
//!
//! A [`CaptureSession`] redirects the current thread's logger (and, unless
//! disabled, its `tracing` dispatcher) into a fresh [`CaptureBuffer`] for the
//! lifetime of one test. When the session ends the previous logger is put
//! back. If the test failed, the failure is reported on the diagnostic stream
//! and the captured entries are replayed into the restored logger, tagged with
//! the test's name and location. Passing tests stay silent.
//!
//! [`around_each`] wraps a test body in a session:
//!
//! ```no_run
//! use logcheck::logging::current_logger;
//! use logcheck::matchers::{Criteria, expect, have_logged};
//! use logcheck::session::around_each;
//! use logcheck::test_info;
//!
//! fn logs_greeting() -> anyhow::Result<()> {
//!     around_each(test_info!(logs_greeting), || -> anyhow::Result<()> {
//!         current_logger().info("hello");
//!         expect(&current_logger()).to(have_logged(Criteria::new().message("hello")))
//!     })?
//! }
//! ```
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::RefCell;
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use serde_json::json;
use tracing_subscriber::layer::SubscriberExt as _;

use crate::config::CaptureConfig;
use crate::error::Error;
use crate::logging::{
    Attributes, CaptureBuffer, CaptureLayer, INTERNAL_TARGET, Logger, LoggerGuard, current_logger,
    set_default,
};
use crate::matchers::{Captured, Subject};

/// Identity of the test a session wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInfo {
    /// Test name, usually a module path.
    pub name: String,
    /// Source location, as `file:line`.
    pub location: String,
}

impl TestInfo {
    /// Describe a test by name and location.
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for TestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// Build a [`TestInfo`] for the calling code.
///
/// `test_info!()` names the enclosing module, `test_info!(my_test)` appends
/// the given identifier, and `test_info!("name")` uses the string as is. The
/// location is always the macro's call site.
#[macro_export]
macro_rules! test_info {
    () => {
        $crate::session::TestInfo::new(module_path!(), concat!(file!(), ":", line!()))
    };
    ($name:ident) => {
        $crate::session::TestInfo::new(
            concat!(module_path!(), "::", stringify!($name)),
            concat!(file!(), ":", line!()),
        )
    };
    ($name:expr) => {
        $crate::session::TestInfo::new($name, concat!(file!(), ":", line!()))
    };
}

/// Why a test failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Failure description: a panic message or the rendered error.
    pub description: String,
    /// Backtrace or error chain, when one is available.
    pub trace: Option<String>,
}

impl Failure {
    /// A failure with only a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            trace: None,
        }
    }

    /// Attach a trace.
    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Describe a panic from its payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let description = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "test panicked".to_string());
        Self::new(description)
    }
}

/// How a wrapped test body finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The body completed normally.
    Passed,
    /// The body panicked or returned an error.
    Failed(Failure),
}

impl TestOutcome {
    /// Shorthand for a failure with only a description.
    #[must_use]
    pub fn failed(description: impl Into<String>) -> Self {
        Self::Failed(Failure::new(description))
    }

    /// Return `true` for [`TestOutcome::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Test body return values that can report an outcome.
pub trait TestReport {
    /// The outcome this value represents.
    fn outcome(&self) -> TestOutcome;
}

impl TestReport for () {
    fn outcome(&self) -> TestOutcome {
        TestOutcome::Passed
    }
}

impl<T, E: fmt::Debug + fmt::Display> TestReport for Result<T, E> {
    fn outcome(&self) -> TestOutcome {
        match self {
            Ok(_) => TestOutcome::Passed,
            Err(e) => TestOutcome::Failed(Failure::new(e.to_string()).with_trace(format!("{e:?}"))),
        }
    }
}

thread_local! {
    static PANIC_SITE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Install a panic hook, once per process, that records where the current
/// thread panicked and then defers to the hook it replaced.
///
/// A backtrace is recorded too when `RUST_BACKTRACE` enables one.
fn watch_panics() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let mut site = info.location().map_or_else(
                || "panicked at an unknown location".to_string(),
                |location| format!("panicked at {location}"),
            );
            let backtrace = Backtrace::capture();
            if backtrace.status() == BacktraceStatus::Captured {
                let _ = write!(site, "\n{backtrace}");
            }
            let _ = PANIC_SITE.try_with(|slot| {
                if let Ok(mut slot) = slot.try_borrow_mut() {
                    *slot = Some(site);
                }
            });
            previous(info);
        }));
    });
}

fn clear_panic_site() {
    let _ = PANIC_SITE.try_with(|slot| slot.borrow_mut().take());
}

fn take_panic_site() -> Option<String> {
    PANIC_SITE.try_with(|slot| slot.borrow_mut().take()).ok().flatten()
}

/// Overrides held while a session is active; dropping them restores the
/// previous logger and dispatcher.
struct Redirect {
    _logger: LoggerGuard,
    _tracing: Option<tracing::dispatcher::DefaultGuard>,
}

enum State {
    Inactive,
    Active(Redirect),
    Completed,
}

impl State {
    const fn name(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active(_) => "active",
            Self::Completed => "completed",
        }
    }
}

/// Captures the current thread's logs for the duration of one test.
///
/// A session is used once: `start`, run the test, then `end` with its
/// outcome. Dropping an active session restores the previous logger without
/// reporting or replaying anything.
///
/// The redirection is thread-scoped. Background threads spawned by the test
/// capture only if they are handed a clone of the session's logger
/// ([`current_logger`] on the test thread).
pub struct CaptureSession {
    test: TestInfo,
    config: CaptureConfig,
    buffer: CaptureBuffer,
    original: Option<Logger>,
    state: State,
    diagnostics: Box<dyn Write>,
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("test", &self.test)
            .field("config", &self.config)
            .field("state", &self.state.name())
            .field("captured", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl CaptureSession {
    /// Create an inactive session for `test` with default settings,
    /// reporting failures on stderr.
    #[must_use]
    pub fn new(test: TestInfo) -> Self {
        Self {
            test,
            config: CaptureConfig::default(),
            buffer: CaptureBuffer::new(),
            original: None,
            state: State::Inactive,
            diagnostics: Box::new(io::stderr()),
        }
    }

    /// Use `config` instead of the defaults.
    #[must_use]
    pub fn with_config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Write failure reports to `writer` instead of stderr.
    #[must_use]
    pub fn with_diagnostics(mut self, writer: impl Write + 'static) -> Self {
        self.diagnostics = Box::new(writer);
        self
    }

    /// The test this session wraps.
    #[must_use]
    pub const fn test(&self) -> &TestInfo {
        &self.test
    }

    /// Settings in effect.
    #[must_use]
    pub const fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// The buffer entries are captured into.
    #[must_use]
    pub const fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    /// Return `true` between `start` and `end`.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// Return `true` once `end` has run.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.state, State::Completed)
    }

    /// Redirect the current thread's logger into the session buffer.
    ///
    /// The logger in effect beforehand is remembered as the original. With
    /// `capture_tracing` set, a `tracing` dispatcher feeding the same buffer
    /// is installed too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionAlreadyStarted`] if the session is active, or
    /// [`Error::SessionCompleted`] if it has already ended.
    pub fn start(&mut self) -> Result<(), Error> {
        match self.state {
            State::Inactive => {}
            State::Active(_) => return Err(Error::SessionAlreadyStarted),
            State::Completed => return Err(Error::SessionCompleted),
        }

        tracing::debug!(
            target: INTERNAL_TARGET,
            test = %self.test.name,
            level = %self.config.level,
            capture_tracing = self.config.capture_tracing,
            "starting capture session"
        );

        self.original = Some(current_logger());
        let logger = Logger::capturing(self.buffer.clone()).with_level(self.config.level);
        let logger_guard = set_default(logger);
        let tracing_guard = self.config.capture_tracing.then(|| {
            let layer = CaptureLayer::new(self.buffer.clone()).with_level(self.config.level);
            let dispatch = tracing::Dispatch::new(tracing_subscriber::registry().with(layer));
            tracing::dispatcher::set_default(&dispatch)
        });

        self.state = State::Active(Redirect {
            _logger: logger_guard,
            _tracing: tracing_guard,
        });
        Ok(())
    }

    /// Restore the original logger and settle the test's `outcome`.
    ///
    /// On failure the failure is reported (with `report_failure`) and the
    /// captured entries are replayed into the original logger in capture
    /// order (with `replay_on_failure`), tagged with
    /// `{"<replay_tag>": {"name": .., "location": ..}}`. On success the
    /// captured entries are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotActive`] if the session was never started,
    /// or [`Error::SessionCompleted`] if it has already ended.
    pub fn end(&mut self, outcome: &TestOutcome) -> Result<(), Error> {
        let redirect = match std::mem::replace(&mut self.state, State::Completed) {
            State::Active(redirect) => redirect,
            State::Inactive => {
                self.state = State::Inactive;
                return Err(Error::SessionNotActive);
            }
            State::Completed => return Err(Error::SessionCompleted),
        };
        drop(redirect);

        let original = self.original.take().unwrap_or_else(current_logger);
        tracing::debug!(
            target: INTERNAL_TARGET,
            test = %self.test.name,
            captured = self.buffer.len(),
            failed = outcome.is_failed(),
            "capture session ended"
        );

        if let TestOutcome::Failed(failure) = outcome {
            if self.config.report_failure {
                self.report(failure);
            }
            if self.config.replay_on_failure {
                original.tagged(self.replay_tags()).replay(&self.buffer);
            }
        }
        Ok(())
    }

    /// Start the session, run `body`, and end the session with its outcome.
    ///
    /// A panic in `body` counts as a failure; it is resumed unchanged after
    /// the session has ended, and its report carries the panic location.
    /// An `Err` returned by `body` counts as a failure and is handed back in
    /// the `Ok` value.
    ///
    /// The first call installs a process-wide panic hook that records panic
    /// locations before deferring to the previously installed hook.
    ///
    /// # Errors
    ///
    /// Returns a session state error if this session was already used.
    pub fn run<R: TestReport>(mut self, body: impl FnOnce() -> R) -> Result<R, Error> {
        watch_panics();
        self.start()?;
        clear_panic_site();
        let result = panic::catch_unwind(AssertUnwindSafe(body));
        let outcome = match &result {
            Ok(value) => value.outcome(),
            Err(payload) => {
                let mut failure = Failure::from_panic(&**payload);
                failure.trace = take_panic_site();
                TestOutcome::Failed(failure)
            }
        };
        self.end(&outcome)?;
        match result {
            Ok(value) => Ok(value),
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    fn replay_tags(&self) -> Attributes {
        let mut tags = Attributes::new();
        tags.insert(
            self.config.replay_tag.clone(),
            json!({"name": self.test.name, "location": self.test.location}),
        );
        tags
    }

    fn report(&mut self, failure: &Failure) {
        let mut out = format!("{} failed at {}\n", self.test.name, self.test.location);
        for line in failure.description.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        if let Some(trace) = &failure.trace {
            out.push_str("\n  Trace:\n");
            for line in trace.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        let captured = self.buffer.len();
        if captured > 0 && self.config.replay_on_failure {
            let _ = writeln!(
                out,
                "\n  Replaying {captured} captured log entries tagged {}={}",
                self.config.replay_tag, self.test.name
            );
        }
        let _ = self.diagnostics.write_all(out.as_bytes());
        let _ = self.diagnostics.flush();
    }
}

impl Captured for CaptureSession {
    fn captured_buffer(&self) -> Option<CaptureBuffer> {
        Some(self.buffer.clone())
    }
}

impl<'a> From<&'a CaptureSession> for Subject<'a> {
    fn from(session: &'a CaptureSession) -> Self {
        Self::Direct(session)
    }
}

/// Run a test body inside a fresh [`CaptureSession`].
///
/// Settings come from [`CaptureConfig::discover`]. See
/// [`CaptureSession::run`] for how the body's outcome is settled.
///
/// # Errors
///
/// Returns an error if the configuration named by `LOGCHECK_CONFIG` cannot
/// be loaded.
pub fn around_each<R: TestReport>(test: TestInfo, body: impl FnOnce() -> R) -> anyhow::Result<R> {
    let config = CaptureConfig::discover()?;
    Ok(CaptureSession::new(test).with_config(config).run(body)?)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{LogEntry, Severity, current_buffer};
    use crate::matchers::{Criteria, expect, have_logged};
    use std::sync::{Arc, Mutex};

    /// Diagnostic writer whose output the test can read back.
    #[derive(Clone, Default)]
    struct SharedWriter(Arc<Mutex<Vec<u8>>>);

    impl SharedWriter {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn test_id() -> TestInfo {
        TestInfo::new("session::replay", "src/session.rs:1")
    }

    /// A session whose "original" logger is itself capturing, so replay can
    /// be observed.
    fn observed(config: CaptureConfig) -> (CaptureSession, SharedWriter, CaptureBuffer, LoggerGuard) {
        let original = CaptureBuffer::new();
        let guard = set_default(Logger::capturing(original.clone()));
        let diagnostics = SharedWriter::default();
        let session = CaptureSession::new(test_id())
            .with_config(config)
            .with_diagnostics(diagnostics.clone());
        (session, diagnostics, original, guard)
    }

    #[test]
    fn start_redirects_and_end_restores() {
        let (mut session, _, original, _guard) = observed(CaptureConfig::default());
        session.start().unwrap();
        assert!(session.is_active());
        assert!(current_buffer().unwrap().same_buffer(session.buffer()));
        current_logger().info("inside");
        session.end(&TestOutcome::Passed).unwrap();
        assert!(session.is_completed());
        assert!(current_buffer().unwrap().same_buffer(&original));
        assert_eq!(session.buffer().len(), 1);
    }

    #[test]
    fn passing_test_is_never_replayed() {
        let (mut session, diagnostics, original, _guard) = observed(CaptureConfig::default());
        session.start().unwrap();
        current_logger().warn("noise");
        session.end(&TestOutcome::Passed).unwrap();
        assert!(original.is_empty());
        assert!(diagnostics.contents().is_empty());
    }

    #[test]
    fn failing_test_replays_in_capture_order_with_tags() {
        let (mut session, diagnostics, original, _guard) = observed(CaptureConfig::default());
        session.start().unwrap();
        current_logger().debug("first");
        current_logger().log(Severity::Error, "second", json!({"code": 500}));
        session.end(&TestOutcome::failed("boom")).unwrap();

        let replayed = original.entries();
        let captured = session.buffer().entries();
        assert_eq!(replayed.len(), 2);
        for (replayed, captured) in replayed.iter().zip(&captured) {
            assert_eq!(replayed.message, captured.message);
            assert_eq!(replayed.severity, captured.severity);
            assert_eq!(replayed.timestamp, captured.timestamp);
            assert_eq!(
                replayed.attributes["test"],
                json!({"name": "session::replay", "location": "src/session.rs:1"})
            );
        }
        assert_eq!(replayed[1].attributes["code"], json!(500));
        assert!(captured[1].attributes.get("test").is_none());
        assert!(diagnostics.contents().contains("Replaying 2 captured log entries"));
    }

    #[test]
    fn unrelated_failure_with_no_logs_is_still_reported() {
        let (mut session, diagnostics, original, _guard) = observed(CaptureConfig::default());
        session.start().unwrap();
        let failure = Failure::new("expected 1, got 2").with_trace("at src/lib.rs:10");
        session.end(&TestOutcome::Failed(failure)).unwrap();
        assert!(original.is_empty());
        insta::assert_snapshot!(diagnostics.contents().trim_end(), @r"
        session::replay failed at src/session.rs:1
          expected 1, got 2

          Trace:
            at src/lib.rs:10
        ");
    }

    #[test]
    fn replay_and_report_can_be_disabled() {
        let config = CaptureConfig {
            replay_on_failure: false,
            report_failure: false,
            ..CaptureConfig::default()
        };
        let (mut session, diagnostics, original, _guard) = observed(config);
        session.start().unwrap();
        current_logger().error("hidden");
        session.end(&TestOutcome::failed("boom")).unwrap();
        assert!(original.is_empty());
        assert!(diagnostics.contents().is_empty());
    }

    #[test]
    fn custom_replay_tag() {
        let config = CaptureConfig {
            replay_tag: "case".to_string(),
            ..CaptureConfig::default()
        };
        let (mut session, _, original, _guard) = observed(config);
        session.start().unwrap();
        current_logger().info("tagged");
        session.end(&TestOutcome::failed("boom")).unwrap();
        assert_eq!(original.entries()[0].attributes["case"]["name"], json!("session::replay"));
    }

    #[test]
    fn level_threshold_applies_to_captured_entries() {
        let config = CaptureConfig {
            level: Severity::Warn,
            ..CaptureConfig::default()
        };
        let (mut session, _, _original, _guard) = observed(config);
        session.start().unwrap();
        current_logger().info("dropped");
        current_logger().warn("kept");
        tracing::info!("dropped too");
        tracing::error!("kept too");
        session.end(&TestOutcome::Passed).unwrap();
        let messages: Vec<String> = session
            .buffer()
            .entries()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, ["kept", "kept too"]);
    }

    #[test]
    fn tracing_events_are_captured_while_active() {
        let (mut session, _, _original, _guard) = observed(CaptureConfig::default());
        session.start().unwrap();
        tracing::info!(user_id = 123, "User logged in");
        expect(&session)
            .to(have_logged(
                Criteria::new()
                    .severity(Severity::Info)
                    .message("User logged in")
                    .attribute("user_id", 123),
            ))
            .unwrap();
        session.end(&TestOutcome::Passed).unwrap();
        tracing::info!("after the session");
        assert_eq!(session.buffer().len(), 1);
    }

    #[test]
    fn tracing_capture_can_be_disabled() {
        let config = CaptureConfig {
            capture_tracing: false,
            ..CaptureConfig::default()
        };
        let (mut session, _, _original, _guard) = observed(config);
        session.start().unwrap();
        tracing::info!("not captured");
        current_logger().info("captured");
        session.end(&TestOutcome::Passed).unwrap();
        assert_eq!(session.buffer().entries()[0].message, "captured");
        assert_eq!(session.buffer().len(), 1);
    }

    #[test]
    fn lifecycle_errors() {
        let mut session = CaptureSession::new(test_id()).with_diagnostics(io::sink());
        assert!(matches!(
            session.end(&TestOutcome::Passed),
            Err(Error::SessionNotActive)
        ));
        session.start().unwrap();
        assert!(matches!(session.start(), Err(Error::SessionAlreadyStarted)));
        session.end(&TestOutcome::Passed).unwrap();
        assert!(matches!(session.start(), Err(Error::SessionCompleted)));
        assert!(matches!(
            session.end(&TestOutcome::Passed),
            Err(Error::SessionCompleted)
        ));
    }

    #[test]
    fn dropping_an_active_session_restores_without_replay() {
        let (mut session, diagnostics, original, _guard) = observed(CaptureConfig::default());
        session.start().unwrap();
        current_logger().error("discarded");
        drop(session);
        assert!(current_buffer().unwrap().same_buffer(&original));
        assert!(original.is_empty());
        assert!(diagnostics.contents().is_empty());
    }

    #[test]
    fn run_settles_result_bodies() {
        let (session, diagnostics, original, _guard) = observed(CaptureConfig::default());
        let result = session
            .run(|| -> Result<(), String> {
                current_logger().info("before failing");
                Err("bad state".to_string())
            })
            .unwrap();
        assert_eq!(result, Err("bad state".to_string()));
        assert_eq!(original.entries()[0].message, "before failing");
        assert!(diagnostics.contents().contains("  bad state\n"));
    }

    #[test]
    fn run_returns_passing_value() {
        let (session, _, original, _guard) = observed(CaptureConfig::default());
        let value = session
            .run(|| -> Result<u32, String> {
                current_logger().info("quiet");
                Ok(7)
            })
            .unwrap();
        assert_eq!(value, Ok(7));
        assert!(original.is_empty());
    }

    #[test]
    fn run_resumes_panics_after_replay() {
        let (session, diagnostics, original, _guard) = observed(CaptureConfig::default());
        let fail = true;
        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            session.run(|| {
                current_logger().info("about to panic");
                assert!(!fail, "assertion failed: left == right");
            })
        }));
        let payload = caught.unwrap_err();
        assert_eq!(
            Failure::from_panic(&*payload).description,
            "assertion failed: left == right"
        );
        assert!(current_buffer().unwrap().same_buffer(&original));
        assert_eq!(original.entries()[0].message, "about to panic");
        assert!(
            diagnostics
                .contents()
                .contains("assertion failed: left == right")
        );
    }

    #[test]
    fn panic_report_names_the_panic_location() {
        let (session, diagnostics, _original, _guard) = observed(CaptureConfig::default());
        let fail = true;
        let line = line!() + 3;
        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            session.run(|| {
                assert!(!fail, "checkout total mismatch");
            })
        }));
        assert!(caught.is_err());
        let report = diagnostics.contents();
        assert!(report.contains("  checkout total mismatch\n"));
        assert!(report.contains("\n  Trace:\n"));
        assert!(report.contains(&format!("    panicked at {}:{line}:", file!())));
    }

    #[test]
    fn failure_from_panic_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(Failure::from_panic(&*owned).description, "owned");
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        assert_eq!(Failure::from_panic(&*borrowed).description, "borrowed");
        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(Failure::from_panic(&*other).description, "test panicked");
    }

    #[test]
    fn result_report_carries_debug_trace() {
        let result: Result<(), String> = Err("outer".to_string());
        assert_eq!(
            result.outcome(),
            TestOutcome::Failed(Failure::new("outer").with_trace("\"outer\""))
        );
        assert!(result.outcome().is_failed());
        assert_eq!(().outcome(), TestOutcome::Passed);
    }

    #[test]
    fn test_info_macro_forms() {
        let plain = crate::test_info!();
        assert_eq!(plain.name, module_path!());
        assert!(plain.location.starts_with(file!()));
        let named = crate::test_info!(some_test);
        assert_eq!(named.name, concat!(module_path!(), "::some_test"));
        let literal = crate::test_info!("custom name");
        assert_eq!(literal.name, "custom name");
        assert_eq!(
            TestInfo::new("a", "b.rs:1").to_string(),
            "a (b.rs:1)"
        );
    }

    #[test]
    fn replayed_entries_keep_their_original_form() {
        let (mut session, _, original, _guard) = observed(CaptureConfig::default());
        session.start().unwrap();
        let entry = LogEntry::new(Severity::Fatal, "crash").with_progname("worker");
        current_logger().write_entry(&entry);
        session.end(&TestOutcome::failed("boom")).unwrap();
        let replayed = &original.entries()[0];
        assert_eq!(replayed.progname.as_deref(), Some("worker"));
        assert_eq!(replayed.severity, Severity::Fatal);
        assert_eq!(replayed.timestamp, entry.timestamp);
    }
}
