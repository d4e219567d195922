use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    handlers::{files, scrape},
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .merge(create_scrape_routes())
        .route("/files/list", get(files::list_files_handler))
}

fn create_scrape_routes() -> Router<AppState> {
    Router::new()
        .route("/scrape/start", post(scrape::start_scrape_handler))
        .route("/scrape/stop", post(scrape::stop_scrape_handler))
        .route("/scrape/status", get(scrape::scrape_status_handler))
        .route("/scrape/results", get(scrape::scrape_results_handler))
}
