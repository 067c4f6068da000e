//! The `have_logged` matcher.
use std::fmt::Write as _;

use super::Matcher;
use super::criteria::Criteria;
use crate::logging::{CaptureBuffer, LogEntry};

/// Result of the last evaluation.
#[derive(Debug, Clone)]
struct Outcome {
    matched: bool,
    buffer: CaptureBuffer,
    entries: Vec<LogEntry>,
}

/// Expects at least one captured entry to satisfy a [`Criteria`] set.
///
/// Built with [`have_logged`]. After evaluation the matcher remembers the
/// outcome, the buffer it searched, and a snapshot of the entries it saw,
/// which the failure messages list.
#[derive(Debug, Clone)]
pub struct HaveLogged {
    criteria: Criteria,
    outcome: Option<Outcome>,
}

/// Expect an entry satisfying `criteria`.
#[must_use]
pub const fn have_logged(criteria: Criteria) -> HaveLogged {
    HaveLogged {
        criteria,
        outcome: None,
    }
}

impl HaveLogged {
    /// The criteria this matcher searches for.
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Outcome of the last evaluation, if any.
    #[must_use]
    pub fn matched(&self) -> Option<bool> {
        self.outcome.as_ref().map(|o| o.matched)
    }

    /// The buffer searched by the last evaluation, if any.
    #[must_use]
    pub fn searched_buffer(&self) -> Option<&CaptureBuffer> {
        self.outcome.as_ref().map(|o| &o.buffer)
    }

    fn entries(&self) -> &[LogEntry] {
        self.outcome
            .as_ref()
            .map(|o| o.entries.as_slice())
            .unwrap_or_default()
    }

    fn captured_listing(&self) -> String {
        let entries = self.entries();
        if self.outcome.is_none() {
            return "Captured log entries: not evaluated".to_string();
        }
        if entries.is_empty() {
            return "Captured log entries: none".to_string();
        }
        let mut out = format!("Captured log entries ({}):", entries.len());
        for entry in entries {
            let _ = write!(out, "\n  {}", entry.summary());
        }
        out
    }
}

impl Matcher for HaveLogged {
    fn matches_buffer(&mut self, buffer: &CaptureBuffer) -> bool {
        let entries = buffer.entries();
        let matched = entries.iter().any(|entry| self.criteria.matches(entry));
        self.outcome = Some(Outcome {
            matched,
            buffer: buffer.clone(),
            entries,
        });
        matched
    }

    fn description(&self) -> String {
        format!("have logged {}", self.criteria)
    }

    fn failure_message(&self) -> String {
        format!(
            "expected to have logged {}\n\n{}",
            self.criteria,
            self.captured_listing()
        )
    }

    fn failure_message_when_negated(&self) -> String {
        let mut out = format!(
            "expected not to have logged {}, but it was present:",
            self.criteria
        );
        for entry in self.entries().iter().filter(|e| self.criteria.matches(e)) {
            let _ = write!(out, "\n  {}", entry.summary());
        }
        out.push_str("\n\n");
        out.push_str(&self.captured_listing());
        out
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{Logger, Severity, current_logger, set_default};
    use crate::matchers::Subject;
    use serde_json::json;
    use std::cell::Cell;

    fn logged_in() -> (Logger, CaptureBuffer) {
        let buffer = CaptureBuffer::new();
        let log = Logger::capturing(buffer.clone());
        log.log(Severity::Info, "User logged in", json!({"user_id": 123}));
        (log, buffer)
    }

    #[test]
    fn matches_logger_with_expected_entry() {
        let (log, _) = logged_in();
        let mut matcher = have_logged(
            Criteria::new()
                .severity(Severity::Info)
                .message("User logged in")
                .attributes(json!({"user_id": 123}))
                .unwrap(),
        );
        assert!(matcher.evaluate(Subject::from(&log)).unwrap());
        assert_eq!(matcher.matched(), Some(true));
    }

    #[test]
    fn does_not_match_missing_entry() {
        let (log, _) = logged_in();
        let mut matcher = have_logged(
            Criteria::new()
                .severity(Severity::Error)
                .message("Error occurred"),
        );
        assert!(!matcher.evaluate(Subject::from(&log)).unwrap());
        assert_eq!(matcher.matched(), Some(false));
    }

    #[test]
    fn remembers_searched_buffer() {
        let (log, buffer) = logged_in();
        let mut matcher = have_logged(Criteria::new().message("User logged in"));
        assert!(matcher.searched_buffer().is_none());
        matcher.evaluate(Subject::from(&log)).unwrap();
        assert!(matcher.searched_buffer().unwrap().same_buffer(&buffer));
    }

    #[test]
    fn deferred_action_runs_once_and_is_searched() {
        let buffer = CaptureBuffer::new();
        let _guard = set_default(Logger::capturing(buffer));
        let runs = Cell::new(0);
        let mut matcher = have_logged(
            Criteria::new()
                .severity(Severity::Warn)
                .message("Block log message"),
        );
        let matched = matcher
            .evaluate(Subject::deferred(|| {
                runs.set(runs.get() + 1);
                current_logger().warn("Block log message");
            }))
            .unwrap();
        assert!(matched);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn deferred_action_sees_earlier_entries_too() {
        let buffer = CaptureBuffer::new();
        let _guard = set_default(Logger::capturing(buffer));
        current_logger().info("logged before");
        let mut matcher = have_logged(Criteria::new().message("logged before"));
        assert!(matcher.evaluate(Subject::deferred(|| {})).unwrap());
    }

    #[test]
    fn deferred_action_without_the_entry_fails() {
        let _guard = set_default(Logger::capturing(CaptureBuffer::new()));
        let mut matcher = have_logged(
            Criteria::new()
                .severity(Severity::Error)
                .message("Error occurred"),
        );
        let matched = matcher
            .evaluate(Subject::deferred(|| {
                current_logger().log(Severity::Info, "User logged in", json!({"user_id": 123}));
            }))
            .unwrap();
        assert!(!matched);
    }

    #[test]
    fn description_renders_criteria() {
        let matcher = have_logged(Criteria::new().severity(Severity::Info).message("hi"));
        assert_eq!(
            matcher.description(),
            r#"have logged an entry with severity=info and message="hi""#
        );
    }

    #[test]
    fn failure_message_lists_captured_entries() {
        let (log, _) = logged_in();
        let mut matcher = have_logged(
            Criteria::new()
                .severity(Severity::Error)
                .message("Error occurred"),
        );
        matcher.evaluate(Subject::from(&log)).unwrap();
        insta::assert_snapshot!(matcher.failure_message(), @r#"
        expected to have logged an entry with severity=error and message="Error occurred"

        Captured log entries (1):
          INFO  User logged in {"user_id":123}
        "#);
    }

    #[test]
    fn failure_message_with_empty_buffer() {
        let buffer = CaptureBuffer::new();
        let mut matcher = have_logged(Criteria::new().message("anything"));
        matcher.matches_buffer(&buffer);
        assert!(matcher
            .failure_message()
            .ends_with("Captured log entries: none"));
    }

    #[test]
    fn failure_message_before_evaluation() {
        let matcher = have_logged(Criteria::new().message("anything"));
        assert!(matcher.failure_message().ends_with("not evaluated"));
    }

    #[test]
    fn negated_failure_message_names_present_entry() {
        let (log, _) = logged_in();
        let mut matcher = have_logged(Criteria::new().message("User logged in"));
        matcher.evaluate(Subject::from(&log)).unwrap();
        let message = matcher.failure_message_when_negated();
        assert!(message.starts_with(
            r#"expected not to have logged an entry with message="User logged in", but it was present:"#
        ));
        assert!(message.contains(r#"  INFO  User logged in {"user_id":123}"#));
    }
}
