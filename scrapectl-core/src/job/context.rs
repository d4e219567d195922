use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::progress::{CompletedItem, FailedItem, JobProgress};

/// Handle given to the engine task for one job: the progress it writes and
/// the cancellation token it polls.
#[derive(Debug, Clone)]
pub struct JobContext {
    job_id: Uuid,
    progress: Arc<JobProgress>,
    cancel: CancellationToken,
}

impl JobContext {
    pub fn new(
        job_id: Uuid,
        progress: Arc<JobProgress>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            job_id,
            progress,
            cancel,
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Cooperative check point. Engines call this between work items.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once a stop has been requested.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    pub fn set_total(&self, total: u64) {
        self.progress.set_total(total);
    }

    pub fn record_success(&self, item: CompletedItem) {
        self.progress.record_success(item);
    }

    pub fn record_failure(&self, item: FailedItem) {
        self.progress.record_failure(item);
    }
}
