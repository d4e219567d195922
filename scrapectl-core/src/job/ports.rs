//! Collaborator seams the controller depends on.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{context::JobContext, request::JobRequest};
use crate::{
    error::EngineError,
    paths::PathGuard,
    providers::{ProviderEntry, ProviderResolver, default_providers},
};

/// Default media extensions considered work items during a directory scan.
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "mpg", "mpeg",
    "3gp", "ogv", "ts", "mts", "m2ts", "iso", "rmvb",
];

/// Snapshot of the configuration a job runs under, produced by a fresh
/// configuration load at start time.
///
/// The allow-list and provider table travel with the snapshot so a start
/// always validates against the configuration as it is now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSettings {
    pub media_roots: Vec<PathBuf>,
    /// Lower-case extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Directories caller-supplied paths must stay inside.
    pub safe_dirs: Vec<PathBuf>,
    pub providers: Vec<ProviderEntry>,
    /// Maximum discovery depth below each root (None = unlimited)
    pub max_depth: Option<usize>,
    pub follow_links: bool,
}

impl ScrapeSettings {
    pub fn new(media_roots: Vec<PathBuf>) -> Self {
        Self {
            media_roots,
            extensions: DEFAULT_MEDIA_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            safe_dirs: Vec::new(),
            providers: default_providers(),
            max_depth: None,
            follow_links: false,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_safe_dirs(mut self, safe_dirs: Vec<PathBuf>) -> Self {
        self.safe_dirs = safe_dirs;
        self
    }

    pub fn with_providers(mut self, providers: Vec<ProviderEntry>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Allow-list built from the snapshot. Canonicalises every safe dir, so
    /// call it off the async workers.
    pub fn path_guard(&self) -> PathGuard {
        PathGuard::new(self.safe_dirs.iter().cloned())
    }

    pub fn provider_resolver(&self) -> ProviderResolver {
        ProviderResolver::new(self.providers.clone())
    }
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Loads and validates configuration ahead of a job.
///
/// An `Err` carries every validation message; the controller rejects the
/// start without touching job state.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<ScrapeSettings, Vec<String>>;
}

impl ConfigSource for ScrapeSettings {
    fn load(&self) -> Result<ScrapeSettings, Vec<String>> {
        Ok(self.clone())
    }
}

/// The scraping workload, treated as an opaque long-running task.
///
/// `run` owns the job until it returns. It must set the total once its work
/// list is known and consult [`JobContext::is_cancelled`] between items;
/// items already in flight are always allowed to finish.
#[async_trait]
pub trait JobEngine: Send + Sync + 'static {
    /// Launch-time checks. Failures here abort the start synchronously.
    async fn preflight(
        &self,
        _request: &JobRequest,
        _settings: &ScrapeSettings,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    async fn run(
        &self,
        request: JobRequest,
        settings: ScrapeSettings,
        ctx: JobContext,
    );
}
