use std::fmt;

use scrapectl_core::{JobController, PathGuard};

use crate::infra::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub scrape_control: JobController,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(scrape_control: JobController) -> Self {
        Self { scrape_control }
    }

    pub fn scrape_control(&self) -> &JobController {
        &self.scrape_control
    }

    /// Safe dirs as the current configuration defines them.
    pub async fn path_guard(&self) -> AppResult<PathGuard> {
        self.scrape_control
            .current_path_guard()
            .await
            .map_err(|err| AppError::internal(err.to_string()))
    }
}
