//! `and`-composition of matchers.
use std::fmt::Write as _;

use super::Matcher;
use crate::logging::CaptureBuffer;

/// Holds when every term holds.
///
/// Built with [`Matcher::and`]. Terms are kept in a flat list, so the
/// failure message names each unmet term by its position in the chain.
/// A deferred action is run once for the whole chain; every term then
/// searches the same buffer.
#[derive(Debug, Default)]
pub struct AllOf {
    terms: Vec<Box<dyn Matcher>>,
    results: Vec<bool>,
}

impl AllOf {
    /// Append a term, splicing in the terms of another chain.
    pub fn push(&mut self, mut term: Box<dyn Matcher>) {
        match term.take_terms() {
            Some(terms) => self.terms.extend(terms),
            None => self.terms.push(term),
        }
        self.results.clear();
    }

    /// Number of terms in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Return `true` if the chain has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// One-based positions of the terms that failed in the last evaluation.
    #[must_use]
    pub fn failed_terms(&self) -> Vec<usize> {
        self.results
            .iter()
            .enumerate()
            .filter(|(_, ok)| !**ok)
            .map(|(i, _)| i + 1)
            .collect()
    }

    fn expected_list(&self) -> String {
        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            let _ = write!(out, "\n  [{}] {}", i + 1, term.description());
        }
        out
    }
}

impl Matcher for AllOf {
    fn matches_buffer(&mut self, buffer: &CaptureBuffer) -> bool {
        self.results = self
            .terms
            .iter_mut()
            .map(|term| term.matches_buffer(buffer))
            .collect();
        self.results.iter().all(|ok| *ok)
    }

    fn description(&self) -> String {
        self.terms
            .iter()
            .map(|term| term.description())
            .collect::<Vec<_>>()
            .join(" and ")
    }

    fn failure_message(&self) -> String {
        let failed = self.failed_terms();
        let mut out = format!("expected all of:{}\n\n", self.expected_list());
        let _ = write!(
            out,
            "{} of {} expectations failed:",
            failed.len(),
            self.terms.len()
        );
        for position in failed {
            if let Some(term) = self.terms.get(position - 1) {
                let message = term.failure_message();
                let mut lines = message.lines();
                let _ = write!(out, "\n\n  [{position}] {}", lines.next().unwrap_or_default());
                for line in lines {
                    if line.is_empty() {
                        out.push('\n');
                    } else {
                        let _ = write!(out, "\n    {line}");
                    }
                }
            }
        }
        out
    }

    fn failure_message_when_negated(&self) -> String {
        format!(
            "expected not all of:{}\n\nbut every expectation held",
            self.expected_list()
        )
    }

    fn and<M: Matcher + 'static>(mut self, other: M) -> AllOf
    where
        Self: Sized + 'static,
    {
        self.push(Box::new(other));
        self
    }

    fn take_terms(&mut self) -> Option<Vec<Box<dyn Matcher>>> {
        self.results.clear();
        Some(std::mem::take(&mut self.terms))
    }
}
