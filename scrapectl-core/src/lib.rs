//! # scrapectl core
//!
//! Control plane for a single long-running media scrape job.
//!
//! ## Overview
//!
//! - **Job control**: [`JobController`] starts, stops and reports on the one
//!   job allowed to run at a time. Start is serialised; status and results
//!   are non-blocking reads that can interleave freely with the engine.
//! - **Progress**: [`JobProgress`] is created per job and written only by
//!   the engine task through its [`JobContext`].
//! - **Engine**: [`JobEngine`] is the seam for the scraping workload.
//!   [`engine::DirectoryScrapeEngine`] discovers media files under the
//!   configured roots and hands each one to an [`engine::ItemScraper`].
//! - **Guards**: [`PathGuard`] keeps caller paths inside allowed
//!   directories; [`ProviderResolver`] maps explicit source URLs to
//!   providers.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scrapectl_core::{
//!     JobController, ScrapeSettings, StartScrapeRequest,
//!     engine::{DirectoryScrapeEngine, IdentifierScraper},
//! };
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ScrapeSettings::new(vec!["/srv/media".into()])
//!         .with_safe_dirs(vec!["/srv/media".into()]);
//!     let engine = DirectoryScrapeEngine::new(Arc::new(IdentifierScraper::new()));
//!     let controller = JobController::new(Arc::new(engine), Arc::new(settings));
//!
//!     controller.start(StartScrapeRequest::default()).await?;
//!     println!("{:?}", controller.status());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod engine;
pub mod error;
pub mod job;
pub mod paths;
pub mod providers;

pub use error::{EngineError, JobControlError, PathAccessError, ScrapeError};
pub use job::{
    CompletedItem, ConfigSource, FailedItem, JobContext, JobController,
    JobEngine, JobMode, JobProgress, JobRequest, JobState, ProgressCounters,
    ProgressResults, ScrapeCommandResponse, ScrapeResultItem,
    ScrapeResultsResponse, ScrapeSettings, ScrapeStatusResponse,
    SingleJobTarget, SourceOverride, StartScrapeRequest,
};
pub use paths::PathGuard;
pub use providers::{ProviderEntry, ProviderResolver};
