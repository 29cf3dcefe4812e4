//! LLM configuration routes.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use smartoffer_llm::providers;
use smartoffer_llm::{LLMConfigUpdate, LLMProvider, TestKeyRequest};

use crate::state::AppState;

const KEY_TEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/llm/config", get(get_config).put(update_config))
        .route("/llm/config/test", post(test_key))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = state.llm_config.read();
    Json(serde_json::to_value(config.to_response()).unwrap_or_default())
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LLMConfigUpdate>,
) -> impl IntoResponse {
    let mut config = state.llm_config.write();
    // Only a config that reached disk becomes live.
    let mut updated = config.clone();
    updated.apply_update(&update);

    if let Err(e) = updated.save() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("Failed to save config: {}", e) })),
        );
    }
    *config = updated;

    (
        StatusCode::OK,
        Json(serde_json::to_value(config.to_response()).unwrap_or_default()),
    )
}

async fn test_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TestKeyRequest>,
) -> impl IntoResponse {
    let Some(provider) = LLMProvider::parse(&req.provider) else {
        return Json(serde_json::json!({
            "success": false,
            "error": format!("Unknown provider: {}", req.provider),
        }));
    };
    let base_url = state.llm_config.read().base_url(provider);

    match providers::test_api_key(&state.http, provider, &base_url, &req.api_key, KEY_TEST_TIMEOUT)
        .await
    {
        Ok(()) => Json(serde_json::json!({ "success": true })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e })),
    }
}
