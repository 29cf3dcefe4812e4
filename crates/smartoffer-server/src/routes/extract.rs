//! Extraction routes: local regex, remote-with-fallback, and remote only.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use smartoffer_extract::ExtractionEnvelope;
use smartoffer_llm::{extract_remote, extract_with_fallback, ExtractRequest};
use tracing::{info, warn};

use super::{failure, require_text};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extract", post(extract_local))
        .route("/offers/extract", post(extract_offer))
        .route("/remote-extract", post(extract_remote_only))
}

fn request_text(
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<(String, ExtractRequest), Response> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected extraction request: {}", e);
        failure(StatusCode::BAD_REQUEST, super::INVALID_INPUT).into_response()
    })?;
    let text = require_text(req.text.clone()).map_err(IntoResponse::into_response)?;
    Ok((text, req))
}

/// POST /api/extract: local extractor, `{ success, data | error }`.
async fn extract_local(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Response {
    let (text, _) = match request_text(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let envelope = ExtractionEnvelope::from(state.extractor.extract(&text));
    let status = if envelope.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(envelope)).into_response()
}

/// POST /api/offers/extract: remote first unless `method` is `regex`,
/// falling back to the local extractor.
async fn extract_offer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Response {
    let (text, req) = match request_text(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Resolve before awaiting so the config lock is not held across the call.
    let resolved = state.llm_config.read().resolve_provider();

    match extract_with_fallback(
        &state.http,
        resolved.as_ref(),
        &state.extractor,
        &text,
        req.method,
        state.remote_timeout(),
    )
    .await
    {
        Ok(tagged) => {
            info!(
                "Offer extracted via {:?} in {}ms",
                tagged.method, tagged.processing_time_ms
            );
            let mut body = serde_json::to_value(&tagged).unwrap_or_default();
            if let Some(obj) = body.as_object_mut() {
                obj.insert("success".into(), serde_json::Value::Bool(true));
            }
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// POST /api/remote-extract: hosted model only, no fallback.
async fn extract_remote_only(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Response {
    let (text, _) = match request_text(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let resolved = state.llm_config.read().resolve_provider();
    let Some(resolved) = resolved else {
        return failure(StatusCode::SERVICE_UNAVAILABLE, "No LLM provider configured")
            .into_response();
    };

    let started = Instant::now();
    let timeout = state.remote_timeout();
    let result =
        tokio::time::timeout(timeout, extract_remote(&state.http, &resolved, &text)).await;

    match result {
        Ok(Ok(data)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "data": data,
                "provider": resolved.provider.to_string(),
                "processingTimeMs": started.elapsed().as_millis() as u64,
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!("Remote extraction failed: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(_) => {
            let e = smartoffer_core::Error::Timeout(timeout.as_millis() as u64);
            warn!("{}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
