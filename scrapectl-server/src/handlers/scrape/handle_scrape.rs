use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use scrapectl_core::{
    JobControlError, ScrapeCommandResponse, ScrapeResultsResponse,
    ScrapeStatusResponse, StartScrapeRequest,
};
use tracing::warn;

use crate::infra::{app_state::AppState, errors::AppError};

#[derive(Debug)]
pub struct ScrapeHttpError {
    status: StatusCode,
    message: String,
}

impl ScrapeHttpError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JobControlError> for ScrapeHttpError {
    fn from(error: JobControlError) -> Self {
        let status = match &error {
            JobControlError::JobAlreadyRunning => StatusCode::CONFLICT,
            JobControlError::UnsupportedSource(_)
            | JobControlError::MissingTarget => StatusCode::BAD_REQUEST,
            JobControlError::PathAccessDenied(_) => StatusCode::FORBIDDEN,
            JobControlError::TargetNotFound(_) => StatusCode::NOT_FOUND,
            JobControlError::Configuration(_) | JobControlError::Launch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            warn!(error = %error, "scrape start failed");
        }
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ScrapeHttpError {
    fn into_response(self) -> axum::response::Response {
        AppError::new(self.status, self.message).into_response()
    }
}

pub async fn start_scrape_handler(
    State(state): State<AppState>,
    body: Option<Json<StartScrapeRequest>>,
) -> Result<Json<ScrapeCommandResponse>, ScrapeHttpError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let response = state.scrape_control().start(request).await?;
    Ok(Json(response))
}

pub async fn stop_scrape_handler(
    State(state): State<AppState>,
) -> Json<ScrapeCommandResponse> {
    Json(state.scrape_control().stop())
}

pub async fn scrape_status_handler(
    State(state): State<AppState>,
) -> Json<ScrapeStatusResponse> {
    Json(state.scrape_control().status())
}

pub async fn scrape_results_handler(
    State(state): State<AppState>,
) -> Json<ScrapeResultsResponse> {
    Json(state.scrape_control().results())
}
