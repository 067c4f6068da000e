//! In-memory capture buffer.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::entry::{Attributes, LogEntry};
use super::sink::Sink;
use crate::matchers::Criteria;

/// Append-only, thread-safe record of captured log entries.
///
/// Cloning yields another handle to the same buffer, so a logger, a
/// `tracing` layer and the matchers can all observe one sequence. Appends
/// and reads take a short mutex-protected critical section; readers always
/// get a snapshot, so appends from background threads never disturb an
/// iteration in progress.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A push never leaves a partial entry, so a poisoned vec is still whole.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry at the tail.
    pub fn append(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    /// Snapshot of all entries in emission order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Number of captured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// First entry satisfying `criteria`, if any.
    #[must_use]
    pub fn find(&self, criteria: &Criteria) -> Option<LogEntry> {
        self.lock().iter().find(|entry| criteria.matches(entry)).cloned()
    }

    /// All entries satisfying `criteria`, in emission order.
    #[must_use]
    pub fn matching(&self, criteria: &Criteria) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| criteria.matches(entry))
            .cloned()
            .collect()
    }

    /// Discard all captured entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Re-emit every captured entry into `sink` in capture order.
    ///
    /// Each replayed copy carries `tags` underneath its own attributes; the
    /// stored entries are left untouched. The buffer lock is released before
    /// the sink is called, so a sink may itself log.
    pub fn replay_into(&self, sink: &dyn Sink, tags: &Attributes) {
        for entry in self.entries() {
            sink.write(entry.tagged(tags));
        }
    }

    /// Return `true` if `other` is a handle to the same underlying buffer.
    #[must_use]
    pub fn same_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl Sink for CaptureBuffer {
    fn write(&self, entry: LogEntry) {
        self.append(entry);
    }

    fn capture_buffer(&self) -> Option<CaptureBuffer> {
        Some(self.clone())
    }
}
