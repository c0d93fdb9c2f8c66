//! Media upload route.
//!
//! Uploading only stores the file and hands back its URL. Attaching the URL
//! to a record is a separate collection update by the client.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::post,
};
use tracing::instrument;

use crate::db::RecordStore;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::storage::{MAX_UPLOAD_BYTES, MediaNamespace, StoredObject};

/// Multipart framing allowance on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// Build the upload router.
pub fn router<S: RecordStore>() -> Router<AppState<S>> {
    Router::new().route(
        "/api/admin/uploads/{namespace}",
        post(upload::<S>).layer(DefaultBodyLimit::max(
            MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
        )),
    )
}

#[instrument(skip(state, _admin, multipart))]
async fn upload<S: RecordStore>(
    State(state): State<AppState<S>>,
    _admin: RequireAdmin,
    Path(namespace): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<StoredObject>, AppError> {
    let namespace: MediaNamespace = namespace.parse().map_err(AppError::NotFound)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

        let stored = state.media().put(namespace, &content_type, bytes).await?;
        return Ok(Json(stored));
    }

    Err(AppError::BadRequest(format!(
        "missing multipart field '{FILE_FIELD}'"
    )))
}
