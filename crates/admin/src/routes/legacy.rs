//! Flat-file content routes.
//!
//! ```text
//! GET /api/admin/{section}   - Section as stored
//! PUT /api/admin/{section}   - Replace the section, {"success": true}
//! ```
//!
//! Errors keep the fixed wording the older admin screens match on:
//! `{"error": "Failed to fetch <section>"}` and
//! `{"error": "Failed to update <section>"}`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value as JsonValue, json};
use tracing::instrument;

use crate::content_file::{ContentFileError, ContentSection};
use crate::db::RecordStore;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the flat-file router.
pub fn router<S: RecordStore>() -> Router<AppState<S>> {
    Router::new().route(
        "/api/admin/{section}",
        get(fetch_section::<S>).put(update_section::<S>),
    )
}

fn parse_section(section: &str) -> Result<ContentSection, AppError> {
    section.parse().map_err(AppError::NotFound)
}

fn failure(status: StatusCode, verb: &str, section: ContentSection) -> Response {
    (
        status,
        Json(json!({ "error": format!("Failed to {verb} {}", section.label()) })),
    )
        .into_response()
}

#[instrument(skip(state, _admin))]
async fn fetch_section<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path(section): Path<String>,
) -> Result<Response, AppError> {
    let section = parse_section(&section)?;
    match state.content_file().section(section).await {
        Ok(value) => Ok(Json(value).into_response()),
        Err(e) => {
            tracing::error!(error = %e, %section, "failed to read content section");
            Ok(failure(StatusCode::INTERNAL_SERVER_ERROR, "fetch", section))
        }
    }
}

#[instrument(skip(state, _admin, body))]
async fn update_section<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path(section): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let section = parse_section(&section)?;

    let Ok(value) = serde_json::from_slice::<JsonValue>(&body) else {
        return Ok(failure(StatusCode::BAD_REQUEST, "update", section));
    };

    match state.content_file().replace_section(section, value).await {
        Ok(()) => Ok(Json(json!({ "success": true })).into_response()),
        Err(ContentFileError::Malformed { reason, .. }) => {
            tracing::warn!(%section, %reason, "rejected malformed content section");
            Ok(failure(StatusCode::BAD_REQUEST, "update", section))
        }
        Err(e) => {
            tracing::error!(error = %e, %section, "failed to write content section");
            Ok(failure(StatusCode::INTERNAL_SERVER_ERROR, "update", section))
        }
    }
}
