//! Scrape job control: lifecycle state, progress, and the read-only views
//! served to callers.

pub mod context;
pub mod controller;
pub mod ports;
pub mod progress;
pub mod projection;
pub mod request;
pub mod state;

pub use context::JobContext;
pub use controller::JobController;
pub use ports::{ConfigSource, DEFAULT_MEDIA_EXTENSIONS, JobEngine, ScrapeSettings};
pub use progress::{
    CompletedItem, FailedItem, JobProgress, ProgressCounters, ProgressResults,
};
pub use projection::{
    ScrapeCommandResponse, ScrapeResultItem, ScrapeResultsResponse,
    ScrapeStatusResponse,
};
pub use request::{
    JobMode, JobRequest, SingleJobTarget, SourceOverride, StartScrapeRequest,
};
pub use state::JobState;
