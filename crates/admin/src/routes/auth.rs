//! Admin login routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::RecordStore;
use crate::error::AppError;
use crate::middleware::current_admin;
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Build the auth router.
pub fn router<S: RecordStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/api/auth/login", post(login::<S>))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session_status))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

#[instrument(skip_all)]
async fn login<S: RecordStore>(
    State(state): State<AppState<S>>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<StatusCode, AppError> {
    AdminAuthService::new(state.verifier())
        .login(&session, &request.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all)]
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    AdminAuthService::logout(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn session_status(session: Session) -> Json<SessionStatus> {
    let admin = current_admin(&session).await;
    Json(SessionStatus {
        authenticated: admin.is_some(),
        logged_in_at: admin.map(|a| a.logged_in_at),
    })
}
