//! Router tests: requests go through the full Axum stack via `oneshot`
//! (no listening socket), checking status codes and the response shapes the
//! UI relies on.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smartoffer_core::SmartOfferConfig;
use smartoffer_llm::LLMConfig;
use smartoffer_server::{build_router, AppState};

const KENMORE: &str = "Kenmore appliance offer buy Kenmore appliance between July 15th and \
    July 22nd and get 15% back in points available for the next 30 days... member \
    segment_house_owner and Member Tier as VIP Gold. offer applicable only on Washer and Dryers";

// ── Helpers ─────────────────────────────────────────────────────────

fn test_state(dir: &tempfile::TempDir) -> Arc<AppState> {
    let config = SmartOfferConfig::from_env(dir.path().join("data")).unwrap();
    let state = AppState::new(config);
    // Never pick up provider keys from the test environment.
    *state.llm_config.write() = LLMConfig {
        config_path: state.config.data_paths.llm_config_file.clone(),
        ..Default::default()
    };
    Arc::new(state)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec(), headers)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes, _) = send(app, req).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes, _) = send(app, req).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_shape() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir));

    let (status, body) = get_json(app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remoteAvailable"], false);
    assert!(body["remoteProvider"].is_null());
    assert!(body["catalogBrands"].as_u64().unwrap() >= 7);
    assert!(body["defaultYear"].is_number());
    assert!(body["availableModels"].is_array());
}

// ── Extraction ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_local_extract() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir));

    let (status, body) = post_json(app, "/api/extract", json!({ "text": KENMORE })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());
    let data = &body["data"];
    assert_eq!(data["offerName"], "Kenmore Appliances");
    assert_eq!(data["earnType"], "points");
    assert_eq!(data["earnAmount"], "150");
    assert_eq!(data["offerStartDate"], "2025-07-15");
    assert_eq!(data["offerEndDate"], "2025-07-22");
    assert_eq!(data["offerRules"]["Customer Segment"], "segment_house_owner");
    assert_eq!(data["offerRules"]["Membership Level Required"], "VIP Gold");
    assert_eq!(data["offerRules"]["Eligible Products"], "Washer and Dryers");
}

#[tokio::test]
async fn test_invalid_input_text() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);

    for uri in ["/api/extract", "/api/offers/extract", "/api/remote-extract"] {
        for body in [json!({}), json!({ "text": "   " }), json!({ "text": null })] {
            let (status, resp) = post_json(build_router(state.clone()), uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(resp, json!({ "success": false, "error": "Invalid input text" }));
        }
    }

    let req = Request::builder()
        .method("POST")
        .uri("/api/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, _) = send(build_router(state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offer_extract_regex_and_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);

    let (status, body) = post_json(
        build_router(state.clone()),
        "/api/offers/extract",
        json!({ "text": KENMORE, "method": "regex" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["method"], "regex");
    assert!(body["processingTimeMs"].is_number());

    let (status, body) = post_json(
        build_router(state),
        "/api/offers/extract",
        json!({ "text": KENMORE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "regex-fallback");
    assert_eq!(body["remoteError"], "No LLM provider configured");
    assert_eq!(body["data"]["earnAmount"], "150");
}

#[tokio::test]
async fn test_offer_extract_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"offerName\": \"Kenmore\", \"earnType\": \"points\", \"earnAmount\": \"150\"}"}}]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    {
        let mut config = state.llm_config.write();
        config.openai_api_key = Some("sk-test".into());
        config.openai_base_url = Some(server.uri());
    }

    let (status, body) = post_json(
        build_router(state),
        "/api/offers/extract",
        json!({ "text": KENMORE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "remote");
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["data"]["offerName"], "Kenmore");
    assert!(body.get("remoteError").is_none());
}

#[tokio::test]
async fn test_remote_extract_without_provider() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir));

    let (status, body) = post_json(app, "/api/remote-extract", json!({ "text": KENMORE })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No LLM provider configured");
}

// ── Thumbnail ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_thumbnail_from_offer() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);

    let offer = state.extractor.extract(KENMORE).unwrap();
    let (status, body) = post_json(
        build_router(state.clone()),
        "/api/thumbnail",
        json!({ "offer": offer, "text": KENMORE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["theme"], "kenmore");
    assert!(body["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));

    let (status, body) = post_json(
        build_router(state.clone()),
        "/api/thumbnail",
        json!({ "offerName": "Nike Shoes", "earnType": "percentage", "earnAmount": "25" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "nike");

    let (status, body) = post_json(
        build_router(state),
        "/api/thumbnail",
        json!({ "offerName": "Nike", "width": 5000 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

// ── Export ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_export_attachment_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);
    let offer = state.extractor.extract(KENMORE).unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/export?save=true&elide=true")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&offer).unwrap()))
        .unwrap();
    let (status, bytes, headers) = send(build_router(state.clone()), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=\"Kenmore Appliances-data.json\""
    );

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("\n  \"offerName\": \"Kenmore Appliances\""));
    let exported: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(exported["earnAmount"], "150");

    let saved = state
        .config
        .data_paths
        .exports
        .join("Kenmore Appliances-data.json");
    assert_eq!(std::fs::read_to_string(saved).unwrap(), text);
}

#[tokio::test]
async fn test_export_bad_body_gets_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir));

    let req = Request::builder()
        .method("POST")
        .uri("/api/export")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, bytes, _) = send(app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

// ── LLM config ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_llm_config_update_masks_keys() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);

    let req = Request::builder()
        .method("PUT")
        .uri("/api/llm/config")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "preferredProvider": "groq", "groqApiKey": "gsk-secret" }).to_string(),
        ))
        .unwrap();
    let (status, bytes, _) = send(build_router(state.clone()), req).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["groqConfigured"], true);
    assert_eq!(body["activeProvider"], "groq");
    assert!(!body.to_string().contains("gsk-secret"));
    assert!(state.config.data_paths.llm_config_file.exists());

    let (_, body) = get_json(build_router(state.clone()), "/api/llm/config").await;
    assert_eq!(body["preferredProvider"], "groq");

    let (_, body) = get_json(build_router(state), "/api/status").await;
    assert_eq!(body["remoteAvailable"], true);
    assert_eq!(body["remoteProvider"], "groq");
}

#[tokio::test]
async fn test_llm_key_probe_unknown_provider() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir));

    let (status, body) = post_json(
        app,
        "/api/llm/config/test",
        json!({ "provider": "mystery", "apiKey": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unknown provider: mystery");
}

#[tokio::test]
async fn test_llm_config_failed_save_keeps_live_config() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir);

    // A plain file where the config directory should be makes the save fail.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    state.llm_config.write().config_path = blocker.join("llm-config.json");

    let req = Request::builder()
        .method("PUT")
        .uri("/api/llm/config")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "preferredProvider": "groq", "groqApiKey": "gsk-secret" }).to_string(),
        ))
        .unwrap();
    let (status, _, _) = send(build_router(state.clone()), req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = get_json(build_router(state.clone()), "/api/llm/config").await;
    assert_eq!(body["preferredProvider"], "auto");
    assert_eq!(body["groqConfigured"], false);
    assert!(state.llm_config.read().resolve_provider().is_none());
}
