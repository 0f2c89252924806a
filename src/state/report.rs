use crate::state::{FailureKind, PageOutcome};
use crate::TaskError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// One crawl task that ended in an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Run-level log of task results
///
/// Shared by every crawl task. Counters are atomics; the failure list is
/// append-only behind a mutex.
#[derive(Debug, Default)]
pub struct CrawlReport {
    pages_written: AtomicU64,
    pages_already_present: AtomicU64,
    pages_untitled: AtomicU64,
    records_written: AtomicU64,
    failures: Mutex<Vec<TaskFailure>>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Written { records } => {
                self.pages_written.fetch_add(1, Ordering::Relaxed);
                self.records_written
                    .fetch_add(records as u64, Ordering::Relaxed);
            }
            PageOutcome::AlreadyPresent => {
                self.pages_already_present.fetch_add(1, Ordering::Relaxed);
            }
            PageOutcome::Untitled => {
                self.pages_untitled.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_failure(&self, url: &str, error: &TaskError) {
        self.lock_failures().push(TaskFailure {
            url: url.to_string(),
            kind: FailureKind::from(error),
            message: error.to_string(),
        });
    }

    pub fn pages_written(&self) -> u64 {
        self.pages_written.load(Ordering::Relaxed)
    }

    pub fn pages_already_present(&self) -> u64 {
        self.pages_already_present.load(Ordering::Relaxed)
    }

    pub fn pages_untitled(&self) -> u64 {
        self.pages_untitled.load(Ordering::Relaxed)
    }

    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> usize {
        self.lock_failures().len()
    }

    /// Snapshot of all failures so far, in the order they were recorded
    pub fn failures(&self) -> Vec<TaskFailure> {
        self.lock_failures().clone()
    }

    pub fn failures_by_kind(&self) -> HashMap<FailureKind, u64> {
        let mut counts = HashMap::new();
        for failure in self.lock_failures().iter() {
            *counts.entry(failure.kind).or_insert(0) += 1;
        }
        counts
    }

    fn lock_failures(&self) -> MutexGuard<'_, Vec<TaskFailure>> {
        // a panicking task cannot leave a half-pushed Vec behind
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
