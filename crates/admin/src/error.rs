//! Unified error handling for the content service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::content_file::ContentFileError;
use crate::db::RepositoryError;
use crate::services::AdminAuthError;
use crate::storage::StorageError;

/// Application-level error type for API handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Media upload failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Flat-file content document could not be read or written.
    #[error("Content file error: {0}")]
    ContentFile(#[from] ContentFileError),

    /// Login or session handling failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(e) => match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Invalid(_) | RepositoryError::Malformed(_) => {
                    StatusCode::BAD_REQUEST
                }
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Storage(e) => match e {
                StorageError::UnsupportedType(_)
                | StorageError::TooLarge { .. }
                | StorageError::Empty => StatusCode::BAD_REQUEST,
                StorageError::Upstream { .. } | StorageError::Http(_) => StatusCode::BAD_GATEWAY,
                StorageError::Io(_) | StorageError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(AdminAuthError::InvalidPassword) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ContentFile(ContentFileError::Malformed { .. }) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ContentFile(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            StatusCode::BAD_GATEWAY => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agency_core::ValidationError;
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("team 12".to_string());
        assert_eq!(err.to_string(), "Not found: team 12");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RepositoryError::Conflict("raced".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(RepositoryError::Invalid(ValidationError::Required("name")).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::Database(sqlx::Error::PoolTimedOut).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(StorageError::UnsupportedType("text/html".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(
                StorageError::Upstream {
                    status: 503,
                    body: String::new()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AdminAuthError::InvalidPassword.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response =
            AppError::Database(RepositoryError::DataCorruption("bad row 7".to_string()))
                .into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
