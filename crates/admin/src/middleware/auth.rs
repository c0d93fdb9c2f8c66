//! Authentication extractors for admin routes.
//!
//! Every mutating route takes [`RequireAdmin`], so the check runs on the
//! server for each request rather than once in a client-side guard.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tower_sessions::Session;

use crate::models::{AdminSession, session_keys};

/// Extractor that requires a live admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("logged in at {}", admin.logged_in_at)
/// }
/// ```
pub struct RequireAdmin(pub AdminSession);

/// Rejection for unauthenticated admin requests.
#[derive(Debug)]
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        current_admin(session)
            .await
            .map(Self)
            .ok_or(AdminAuthRejection)
    }
}

/// The session's admin marker, if present and not past its maximum age.
///
/// A stale marker is removed from the session.
pub async fn current_admin(session: &Session) -> Option<AdminSession> {
    let admin: AdminSession = session.get(session_keys::ADMIN).await.ok().flatten()?;
    if admin.is_fresh(Utc::now()) {
        return Some(admin);
    }

    tracing::info!(logged_in_at = %admin.logged_in_at, "admin session aged out");
    if let Err(e) = session
        .remove::<AdminSession>(session_keys::ADMIN)
        .await
    {
        tracing::warn!(error = %e, "failed to clear stale admin session");
    }
    None
}
