use std::{fmt, path::Path, sync::Arc};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    context::JobContext,
    ports::{ConfigSource, JobEngine, ScrapeSettings},
    progress::{JobProgress, ProgressCounters},
    projection::{
        ScrapeCommandResponse, ScrapeResultsResponse, ScrapeStatusResponse,
    },
    request::{
        JobMode, JobRequest, SingleJobTarget, SourceOverride,
        StartScrapeRequest,
    },
    state::JobState,
};
use crate::{
    error::{JobControlError, Result},
    paths::PathGuard,
};

/// Command dispatcher + read model for the single scrape job.
///
/// At most one job holds the slot at a time. `start` is serialised through
/// an async gate; `stop`, `status` and `results` only take short
/// synchronous locks and never wait on the engine.
#[derive(Clone)]
pub struct JobController {
    inner: Arc<JobControllerInner>,
}

impl fmt::Debug for JobController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.slot.try_read();
        let job_id = slot.as_ref().and_then(|slot| slot.job_id);
        let stop_requested = slot.as_ref().map(|slot| slot.stop_requested);
        let engine_ptr = Arc::as_ptr(&self.inner.engine);

        f.debug_struct("JobController")
            .field("job_id", &job_id)
            .field("stop_requested", &stop_requested)
            .field("engine_ptr", &engine_ptr)
            .finish()
    }
}

struct JobControllerInner {
    engine: Arc<dyn JobEngine>,
    config: Arc<dyn ConfigSource>,
    start_gate: tokio::sync::Mutex<()>,
    slot: RwLock<JobSlot>,
}

/// State of the current (or most recent) job.
struct JobSlot {
    job_id: Option<Uuid>,
    progress: Arc<JobProgress>,
    cancel: CancellationToken,
    stop_requested: bool,
}

impl Default for JobSlot {
    fn default() -> Self {
        Self {
            job_id: None,
            progress: Arc::new(JobProgress::drained()),
            cancel: CancellationToken::new(),
            stop_requested: false,
        }
    }
}

impl JobControllerInner {
    /// Derive the job state from the progress counters.
    ///
    /// Observing a finished job clears a pending stop request, which is how
    /// `Stopping` decays back to `Idle`.
    fn observe(&self) -> (JobState, ProgressCounters) {
        let slot = self.slot.upgradable_read();
        let counters = slot.progress.counters();

        if counters.is_finished() {
            if slot.stop_requested {
                let mut slot = RwLockUpgradableReadGuard::upgrade(slot);
                slot.stop_requested = false;
                debug!(job_id = ?slot.job_id, "stop flag cleared after drain");
            }
            return (JobState::Idle, counters);
        }

        let state = if slot.stop_requested {
            JobState::Stopping
        } else {
            JobState::Running
        };
        (state, counters)
    }
}

impl JobController {
    pub fn new(
        engine: Arc<dyn JobEngine>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            inner: Arc::new(JobControllerInner {
                engine,
                config,
                start_gate: tokio::sync::Mutex::new(()),
                slot: RwLock::new(JobSlot::default()),
            }),
        }
    }

    /// Allow-list from a fresh configuration load, for callers that need
    /// the same view of the safe dirs a start would see.
    pub async fn current_path_guard(&self) -> Result<PathGuard> {
        let config = Arc::clone(&self.inner.config);
        tokio::task::spawn_blocking(move || {
            config
                .load()
                .map(|settings| settings.path_guard())
                .map_err(JobControlError::Configuration)
        })
        .await
        .map_err(|err| JobControlError::Launch(err.to_string()))?
    }

    /// Validate the request and dispatch a new job.
    ///
    /// Returns once the engine task has been spawned; it does not wait for
    /// any work item. Every rejection happens before job state is touched.
    #[instrument(skip(self, request), fields(mode = %request.mode))]
    pub async fn start(
        &self,
        request: StartScrapeRequest,
    ) -> Result<ScrapeCommandResponse> {
        let _gate = self.inner.start_gate.lock().await;

        let (state, _) = self.inner.observe();
        if state.is_active() {
            return Err(JobControlError::JobAlreadyRunning);
        }

        // Config load and path canonicalisation touch the filesystem.
        let config = Arc::clone(&self.inner.config);
        let (settings, job_request) = tokio::task::spawn_blocking(move || {
            let settings = config.load().map_err(|errors| {
                warn!(errors = ?errors, "configuration rejected; job not started");
                JobControlError::Configuration(errors)
            })?;
            let job_request = validate(request, &settings)?;
            Ok::<_, JobControlError>((settings, job_request))
        })
        .await
        .map_err(|err| JobControlError::Launch(err.to_string()))??;

        self.inner
            .engine
            .preflight(&job_request, &settings)
            .await?;

        let job_id = Uuid::now_v7();
        let progress = Arc::new(JobProgress::pending());
        let cancel = CancellationToken::new();
        *self.inner.slot.write() = JobSlot {
            job_id: Some(job_id),
            progress: Arc::clone(&progress),
            cancel: cancel.clone(),
            stop_requested: false,
        };

        let mode = job_request.mode();
        info!(%job_id, %mode, "scrape job accepted");

        let ctx = JobContext::new(job_id, Arc::clone(&progress), cancel);
        let engine = Arc::clone(&self.inner.engine);
        tokio::spawn(async move {
            let _drain = DrainGuard { job_id, progress };
            engine.run(job_request, settings, ctx).await;
        });

        Ok(ScrapeCommandResponse::new(
            "scrape job started",
            JobState::Running,
        ))
    }

    /// Request cooperative cancellation of the running job.
    ///
    /// Never fails. Items already in flight finish normally; how long the
    /// job stays `Stopping` is up to the engine's check points.
    #[instrument(skip(self))]
    pub fn stop(&self) -> ScrapeCommandResponse {
        let mut slot = self.inner.slot.write();
        let counters = slot.progress.counters();

        if counters.is_finished() {
            slot.stop_requested = false;
            return ScrapeCommandResponse::new(
                "no scrape job in progress",
                JobState::Idle,
            );
        }

        if slot.stop_requested {
            return ScrapeCommandResponse::new(
                "scrape job is already stopping",
                JobState::Stopping,
            );
        }

        slot.stop_requested = true;
        slot.cancel.cancel();
        info!(
            job_id = ?slot.job_id,
            done = counters.done,
            total = ?counters.total,
            "stop requested"
        );

        ScrapeCommandResponse::new("stop request sent", JobState::Stopping)
    }

    pub fn state(&self) -> JobState {
        self.inner.observe().0
    }

    pub fn status(&self) -> ScrapeStatusResponse {
        let (state, counters) = self.inner.observe();
        ScrapeStatusResponse::project(state, &counters)
    }

    /// Results of the current job so far, or of the last job once it drained.
    pub fn results(&self) -> ScrapeResultsResponse {
        let progress = Arc::clone(&self.inner.slot.read().progress);
        ScrapeResultsResponse::from(&progress.results())
    }

    pub fn current_job_id(&self) -> Option<Uuid> {
        self.inner.slot.read().job_id
    }
}

/// Turn a start request into a job request against the loaded settings.
fn validate(
    request: StartScrapeRequest,
    settings: &ScrapeSettings,
) -> Result<JobRequest> {
    match request.mode {
        JobMode::Default => Ok(JobRequest::Default),
        JobMode::Single => {
            let raw = request
                .path
                .filter(|path| !path.trim().is_empty())
                .ok_or(JobControlError::MissingTarget)?;
            let path = settings.path_guard().check_access(Path::new(&raw))?;

            let source = match request
                .url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
            {
                Some(raw_url) => {
                    let (provider, url) = settings
                        .provider_resolver()
                        .resolve(raw_url)
                        .ok_or_else(|| {
                            JobControlError::UnsupportedSource(
                                raw_url.to_string(),
                            )
                        })?;
                    Some(SourceOverride { provider, url })
                }
                None => None,
            };

            Ok(JobRequest::Single(SingleJobTarget { path, source }))
        }
    }
}

/// Marks the job drained when the engine task ends, including by panic.
struct DrainGuard {
    job_id: Uuid,
    progress: Arc<JobProgress>,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.progress.mark_drained();
        let counters = self.progress.counters();
        info!(
            target: "scrape::summary",
            job_id = %self.job_id,
            done = counters.done,
            total = ?counters.total,
            succeeded = counters.succeeded,
            failed = counters.failed,
            panicked = std::thread::panicking(),
            "scrape job drained"
        );
    }
}
