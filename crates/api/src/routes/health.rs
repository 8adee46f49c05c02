use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Largest body `/upload` accepts, so clients can pre-check file size.
    pub max_upload_bytes: usize,
}

/// GET /health -- liveness probe.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        max_upload_bytes: state.config.max_upload_bytes,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
