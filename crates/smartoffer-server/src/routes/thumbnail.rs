//! Thumbnail route.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use smartoffer_core::OfferData;
use smartoffer_thumbnail::{render, ThumbnailRequest};
use tracing::warn;

use super::failure;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/thumbnail", post(create_thumbnail))
}

/// Either an extraction result plus its source text, or a full request.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThumbnailBody {
    FromOffer {
        offer: OfferData,
        #[serde(default)]
        text: String,
        #[serde(default)]
        theme: Option<String>,
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
    },
    Direct(ThumbnailRequest),
}

impl ThumbnailBody {
    pub fn into_request(self) -> ThumbnailRequest {
        match self {
            ThumbnailBody::FromOffer {
                offer,
                text,
                theme,
                width,
                height,
            } => {
                let mut request = ThumbnailRequest::from_offer(&offer, &text);
                request.theme = theme;
                if let Some(w) = width {
                    request.width = w;
                }
                if let Some(h) = height {
                    request.height = h;
                }
                request
            }
            ThumbnailBody::Direct(request) => request,
        }
    }
}

/// POST /api/thumbnail: `{ success, image, theme }`.
async fn create_thumbnail(payload: Result<Json<ThumbnailBody>, JsonRejection>) -> Response {
    let request = match payload {
        Ok(Json(body)) => body.into_request(),
        Err(e) => return failure(StatusCode::BAD_REQUEST, e.body_text()).into_response(),
    };

    let theme = request.resolve_theme();
    match render(&request) {
        Ok(image) => Json(serde_json::json!({
            "success": true,
            "image": image,
            "theme": theme.key,
        }))
        .into_response(),
        Err(e) => {
            warn!("Thumbnail render failed: {}", e);
            failure(StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}
