//! HTTP gateway (Axum) for synchronous and callback-based appraisal.
//!
//! This module is primarily used by the `answer-appraiser` binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{async_appraisal_handler, sync_appraisal_handler};
pub use state::HandlerState;

pub fn create_router_with_state(state: HandlerState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/get_appraisal", post(sync_appraisal_handler))
        .route("/async_get_appraisal", post(async_appraisal_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
