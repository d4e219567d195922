use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::{
    discovery::MediaDiscovery,
    scraper::{ItemScraper, ScrapeItem},
};
use crate::{
    error::EngineError,
    job::{
        CompletedItem, FailedItem, JobContext, JobEngine, JobRequest,
        ScrapeSettings,
    },
};

/// Engine that scrapes every media file under the configured roots, or a
/// single validated file.
///
/// Items run one at a time in discovery order. Cancellation is checked
/// before each item; an item that has started always finishes and is
/// recorded.
pub struct DirectoryScrapeEngine {
    scraper: Arc<dyn ItemScraper>,
}

impl std::fmt::Debug for DirectoryScrapeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryScrapeEngine").finish_non_exhaustive()
    }
}

impl DirectoryScrapeEngine {
    pub fn new(scraper: Arc<dyn ItemScraper>) -> Self {
        Self { scraper }
    }

    fn discovery(settings: &ScrapeSettings) -> MediaDiscovery {
        let discovery = MediaDiscovery::new(settings.extensions.clone())
            .with_follow_links(settings.follow_links);
        match settings.max_depth {
            Some(depth) => discovery.with_max_depth(depth),
            None => discovery,
        }
    }

    async fn work_list(
        &self,
        request: JobRequest,
        settings: &ScrapeSettings,
    ) -> Result<Vec<ScrapeItem>, EngineError> {
        match request {
            JobRequest::Single(target) => Ok(vec![ScrapeItem {
                path: target.path,
                source: target.source,
            }]),
            JobRequest::Default => {
                let discovery = Self::discovery(settings);
                let roots = settings.media_roots.clone();
                let result = tokio::task::spawn_blocking(move || {
                    discovery.discover(&roots)
                })
                .await
                .map_err(|err| {
                    EngineError::Io(std::io::Error::other(err.to_string()))
                })??;
                for walk_error in &result.errors {
                    warn!(error = %walk_error, "media discovery error");
                }
                Ok(result
                    .items
                    .into_iter()
                    .map(ScrapeItem::discovered)
                    .collect())
            }
        }
    }
}

#[async_trait]
impl JobEngine for DirectoryScrapeEngine {
    async fn preflight(
        &self,
        request: &JobRequest,
        settings: &ScrapeSettings,
    ) -> Result<(), EngineError> {
        match request {
            JobRequest::Default => {
                if settings.media_roots.is_empty() {
                    return Err(EngineError::NoMediaRoots);
                }
                let roots = settings.media_roots.clone();
                tokio::task::spawn_blocking(move || {
                    roots.iter().try_for_each(|root| MediaDiscovery::check_root(root))
                })
                .await
                .map_err(|err| {
                    EngineError::Io(std::io::Error::other(err.to_string()))
                })?
            }
            JobRequest::Single(target) => {
                match tokio::fs::metadata(&target.path).await {
                    Ok(metadata) if metadata.is_file() => Ok(()),
                    _ => Err(EngineError::MissingFile(target.path.clone())),
                }
            }
        }
    }

    async fn run(
        &self,
        request: JobRequest,
        settings: ScrapeSettings,
        ctx: JobContext,
    ) {
        let job_id = ctx.job_id();
        let items = match self.work_list(request, &settings).await {
            Ok(items) => items,
            Err(err) => {
                error!(%job_id, error = %err, "media discovery failed");
                ctx.set_total(0);
                return;
            }
        };

        let total = items.len();
        ctx.set_total(total as u64);
        info!(%job_id, total, "work list discovered");

        for (index, item) in items.into_iter().enumerate() {
            if ctx.is_cancelled() {
                info!(
                    %job_id,
                    remaining = total - index,
                    "cancellation observed; skipping remaining items"
                );
                break;
            }

            match self.scraper.scrape(&item).await {
                Ok(scraped) => {
                    ctx.record_success(CompletedItem::new(item.path, scraped.number));
                }
                Err(err) => {
                    warn!(
                        %job_id,
                        path = %item.path.display(),
                        error = %err,
                        "item failed"
                    );
                    ctx.record_failure(FailedItem::new(item.path, err.to_string()));
                }
            }
        }
    }
}
