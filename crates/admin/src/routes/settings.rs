//! Site settings routes.
//!
//! Hero, about and contact are single documents: read whole, replaced whole.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde_json::Value as JsonValue;
use tracing::instrument;

use agency_core::SettingsKind;

use crate::db::{RecordStore, SettingsRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the settings router.
pub fn router<S: RecordStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/content/settings/{kind}", get(show::<S>))
        .route("/api/admin/settings/{kind}", put(replace::<S>))
}

fn parse_kind(kind: &str) -> Result<SettingsKind, AppError> {
    kind.parse().map_err(AppError::NotFound)
}

#[instrument(skip(state))]
async fn show<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(kind): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    let kind = parse_kind(&kind)?;
    let value = SettingsRepository::new(state.store()).get_json(kind).await?;
    Ok(Json(value))
}

#[instrument(skip(state, _admin, body))]
async fn replace<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path(kind): Path<String>,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, AppError> {
    let kind = parse_kind(&kind)?;
    let value = SettingsRepository::new(state.store())
        .put_json(kind, body)
        .await?;
    Ok(Json(value))
}
