//! JSON export route.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use smartoffer_core::OfferData;
use tracing::{error, info, warn};

use super::failure;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/export", post(export_offer))
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Also write the file under the exports directory.
    #[serde(default)]
    pub save: bool,
    /// Leave out empty fields.
    #[serde(default)]
    pub elide: bool,
}

/// POST /api/export: pretty JSON as an attachment.
async fn export_offer(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
    payload: Result<Json<OfferData>, JsonRejection>,
) -> Response {
    let offer = match payload {
        Ok(Json(offer)) => offer,
        Err(e) => {
            warn!("Rejected export request: {}", e);
            return failure(StatusCode::BAD_REQUEST, e.body_text()).into_response();
        }
    };
    let json = match offer.to_export_json(query.elide) {
        Ok(j) => j,
        Err(e) => return failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };
    let filename = offer.export_filename();

    if query.save {
        let path = state.config.data_paths.exports.join(&filename);
        if let Err(e) = std::fs::write(&path, &json) {
            error!("Failed to save export {}: {}", path.display(), e);
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to save export: {}", e),
            )
            .into_response();
        }
        info!("Saved export to {}", path.display());
    }

    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', "_"));
    let mut response = (StatusCode::OK, json).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
