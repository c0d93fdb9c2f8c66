//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Submitted password does not match.
    #[error("invalid password")]
    InvalidPassword,

    /// The verifier could not be keyed.
    #[error("invalid verifier key")]
    InvalidKey,

    /// Session store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
