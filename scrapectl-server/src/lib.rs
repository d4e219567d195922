//! HTTP control surface for the scrape job controller.
//!
//! [`create_app`] wires the versioned API routes, request tracing and CORS
//! around an [`AppState`]; the binary only adds configuration loading and
//! the listener.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(routes::create_api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
