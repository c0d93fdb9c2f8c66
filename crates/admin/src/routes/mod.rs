//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Store readiness
//!
//! # Auth (shared password)
//! POST /api/auth/login         - {password} -> 204 + session cookie | 401
//! POST /api/auth/logout        - End the session
//! GET  /api/auth/session       - {authenticated, logged_in_at?}
//!
//! # Public read
//! GET  /api/content/{collection}      - Ordered list
//! GET  /api/content/team/grouped      - Team members by category
//! GET  /api/content/settings/{kind}   - hero | about | contact
//!
//! # Admin (session required)
//! POST   /api/admin/collections/{collection}                - Append
//! PUT    /api/admin/collections/{collection}/{id}           - Full update
//! DELETE /api/admin/collections/{collection}/{id}           - Remove
//! POST   /api/admin/collections/{collection}/{id}/move      - {direction: up|down}
//! PUT    /api/admin/collections/{collection}/{id}/position  - {order_index}
//! PUT    /api/admin/settings/{kind}                         - Replace settings
//! POST   /api/admin/uploads/{namespace}                     - Multipart "file" -> {url, path}
//!
//! # Flat-file content (session required)
//! GET|PUT /api/admin/{hero|services|team|clients|gallery}
//! ```

pub mod auth;
pub mod collections;
pub mod legacy;
pub mod settings;
pub mod uploads;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::db::RecordStore;
use crate::state::AppState;

/// Build the full API router.
pub fn routes<S: RecordStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<S>))
        .merge(auth::router())
        .merge(collections::router())
        .merge(settings::router())
        .merge(uploads::router())
        .merge(legacy::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness<S: RecordStore>(State(state): State<AppState<S>>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
