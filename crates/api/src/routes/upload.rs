use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount `POST /upload` with a body limit of `max_upload_bytes`.
///
/// Other methods on the path fall through to axum's 405.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(handlers::upload::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
