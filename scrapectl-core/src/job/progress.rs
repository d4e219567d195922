//! Progress state for one scrape job.
//!
//! A [`JobProgress`] is created per job and shared between the controller
//! (reader) and the engine task (sole writer). Counters and result lists sit
//! behind a single lock so a reader always sees a consistent combination:
//! `done` is bumped together with the success/failure classification, which
//! keeps `done == succeeded + failed` at every observation point.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

/// A work item the engine finished successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedItem {
    pub path: PathBuf,
    /// Catalogue identifier resolved for the item, when the scraper found one.
    pub number: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl CompletedItem {
    pub fn new(path: impl Into<PathBuf>, number: Option<String>) -> Self {
        Self {
            path: path.into(),
            number,
            finished_at: Utc::now(),
        }
    }
}

/// A work item the engine gave up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub path: PathBuf,
    pub error: String,
    pub finished_at: DateTime<Utc>,
}

impl FailedItem {
    pub fn new(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
            finished_at: Utc::now(),
        }
    }
}

/// Point-in-time copy of the job counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressCounters {
    /// `None` until the engine has discovered its work list.
    pub total: Option<u64>,
    pub done: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Set once the engine task has returned, whatever the reason.
    pub drained: bool,
}

impl ProgressCounters {
    /// The job no longer holds the job slot.
    ///
    /// Either the engine task returned, or every discovered item has been
    /// processed. A discovered total of zero counts as finished; an
    /// undiscovered total never does.
    pub fn is_finished(&self) -> bool {
        self.drained || self.total.is_some_and(|total| self.done >= total)
    }
}

/// Point-in-time copy of the result lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressResults {
    pub success: Vec<CompletedItem>,
    pub failed: Vec<FailedItem>,
}

#[derive(Debug, Default)]
struct ProgressInner {
    counters: ProgressCounters,
    results: ProgressResults,
}

#[derive(Debug)]
pub struct JobProgress {
    inner: RwLock<ProgressInner>,
}

impl JobProgress {
    /// Fresh progress for a job that has just been accepted.
    pub fn pending() -> Self {
        Self {
            inner: RwLock::new(ProgressInner::default()),
        }
    }

    /// Progress standing in for "no job has run yet".
    pub fn drained() -> Self {
        let progress = Self::pending();
        progress.mark_drained();
        progress
    }

    pub fn counters(&self) -> ProgressCounters {
        self.inner.read().counters
    }

    pub fn results(&self) -> ProgressResults {
        self.inner.read().results.clone()
    }

    pub fn set_total(&self, total: u64) {
        self.inner.write().counters.total = Some(total);
    }

    pub fn record_success(&self, item: CompletedItem) {
        let mut guard = self.inner.write();
        guard.counters.done += 1;
        guard.counters.succeeded += 1;
        guard.results.success.push(item);
    }

    pub fn record_failure(&self, item: FailedItem) {
        let mut guard = self.inner.write();
        guard.counters.done += 1;
        guard.counters.failed += 1;
        guard.results.failed.push(item);
    }

    pub fn mark_drained(&self) {
        self.inner.write().counters.drained = true;
    }
}

impl Default for JobProgress {
    fn default() -> Self {
        Self::drained()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_progress_is_not_finished_before_discovery() {
        let progress = JobProgress::pending();
        let counters = progress.counters();
        assert_eq!(counters.total, None);
        assert!(!counters.is_finished());
    }

    #[test]
    fn discovering_zero_items_finishes_the_job() {
        let progress = JobProgress::pending();
        progress.set_total(0);
        assert!(progress.counters().is_finished());
    }

    #[test]
    fn done_tracks_success_and_failure_together() {
        let progress = JobProgress::pending();
        progress.set_total(3);
        progress.record_success(CompletedItem::new("/lib/a.mp4", None));
        progress.record_failure(FailedItem::new("/lib/b.mp4", "boom"));

        let counters = progress.counters();
        assert_eq!(counters.done, 2);
        assert_eq!(counters.succeeded + counters.failed, counters.done);
        assert!(!counters.is_finished());

        progress.record_success(CompletedItem::new(
            "/lib/c.mp4",
            Some("ABC-123".into()),
        ));
        assert!(progress.counters().is_finished());

        let results = progress.results();
        assert_eq!(results.success.len(), 2);
        assert_eq!(results.failed.len(), 1);
        assert_eq!(results.failed[0].error, "boom");
    }

    #[test]
    fn drained_progress_reports_finished_without_total() {
        let progress = JobProgress::drained();
        let counters = progress.counters();
        assert!(counters.drained);
        assert!(counters.is_finished());
        assert_eq!(counters.done, 0);
    }
}
