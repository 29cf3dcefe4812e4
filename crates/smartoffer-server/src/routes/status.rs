//! Service status route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

/// GET /api/status: remote provider availability and extractor settings.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = state.llm_config.read();
    let resolved = config.resolve_provider();
    let options = state.extractor.options();

    Json(serde_json::json!({
        "remoteAvailable": resolved.is_some(),
        "remoteProvider": resolved.as_ref().map(|r| r.provider.to_string()),
        "remoteModel": resolved.as_ref().map(|r| r.model.clone()),
        "availableModels": config.available_models(),
        "remoteTimeoutSecs": state.config.remote_timeout_secs,
        "catalogBrands": state.extractor.catalog().brands.len(),
        "defaultYear": options.default_year,
        "maxInputChars": options.max_input_chars,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
