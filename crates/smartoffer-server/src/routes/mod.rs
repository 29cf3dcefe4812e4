//! HTTP route handlers for the offer UI.

pub mod export;
pub mod extract;
pub mod llm;
pub mod status;
pub mod thumbnail;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub(crate) const INVALID_INPUT: &str = "Invalid input text";

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(status::routes())
        .merge(extract::routes())
        .merge(thumbnail::routes())
        .merge(export::routes())
        .merge(llm::routes())
}

/// `{ success: false, error }` with the given status.
pub(crate) fn failure(
    status: StatusCode,
    error: impl Into<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": error.into() })),
    )
}

/// Non-blank request text, or the 400 response for missing input.
pub(crate) fn require_text(
    text: Option<String>,
) -> Result<String, (StatusCode, Json<serde_json::Value>)> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(failure(StatusCode::BAD_REQUEST, INVALID_INPUT)),
    }
}
