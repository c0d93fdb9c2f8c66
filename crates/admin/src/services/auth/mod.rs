//! Admin authentication service.
//!
//! One shared password guards every admin operation. The password never
//! leaves the server: a login compares HMAC-SHA256 digests in constant time
//! and, on a match, stamps the session. Each admin request is then checked
//! against that session by the `RequireAdmin` extractor.

mod error;

pub use error::AdminAuthError;

use std::sync::Arc;

use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::models::{AdminSession, session_keys};

type HmacSha256 = Hmac<Sha256>;

/// Constant-time checker for the shared admin password.
#[derive(Clone)]
pub struct PasswordVerifier {
    key: Arc<SecretString>,
    expected: Arc<[u8]>,
}

impl std::fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordVerifier")
            .field("key", &"[REDACTED]")
            .field("expected", &"[REDACTED]")
            .finish()
    }
}

impl PasswordVerifier {
    /// Key the verifier with `key` and remember the digest of `password`.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidKey` if the MAC cannot be keyed.
    pub fn new(key: &SecretString, password: &SecretString) -> Result<Self, AdminAuthError> {
        let key = Arc::new(key.clone());
        let expected = digest(&key, password.expose_secret())?;
        Ok(Self {
            key,
            expected: expected.into(),
        })
    }

    /// Whether `candidate` is the admin password.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes()) else {
            return false;
        };
        mac.update(candidate.as_bytes());
        mac.verify_slice(&self.expected).is_ok()
    }
}

fn digest(key: &SecretString, value: &str) -> Result<Vec<u8>, AdminAuthError> {
    let mut mac = HmacSha256::new_from_slice(key.expose_secret().as_bytes())
        .map_err(|_| AdminAuthError::InvalidKey)?;
    mac.update(value.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    verifier: &'a PasswordVerifier,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(verifier: &'a PasswordVerifier) -> Self {
        Self { verifier }
    }

    /// Check the password and mark the session as an admin session.
    ///
    /// The session id is rotated on success.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidPassword` on mismatch, or
    /// `AdminAuthError::Session` if the session cannot be written.
    pub async fn login(
        &self,
        session: &Session,
        password: &str,
    ) -> Result<AdminSession, AdminAuthError> {
        if !self.verifier.verify(password) {
            warn!("admin login rejected");
            return Err(AdminAuthError::InvalidPassword);
        }

        let admin = AdminSession {
            logged_in_at: Utc::now(),
        };
        session.cycle_id().await?;
        session.insert(session_keys::ADMIN, &admin).await?;
        info!("admin logged in");
        Ok(admin)
    }

    /// End the admin session.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Session` if the session cannot be deleted.
    pub async fn logout(session: &Session) -> Result<(), AdminAuthError> {
        session.flush().await?;
        info!("admin logged out");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verifier() -> PasswordVerifier {
        PasswordVerifier::new(
            &SecretString::from("k3y-Material-For-Tests-0123456789"),
            &SecretString::from("correct horse battery staple"),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_accepts_only_exact_password() {
        let verifier = verifier();
        assert!(verifier.verify("correct horse battery staple"));
        assert!(!verifier.verify("correct horse battery stapl"));
        assert!(!verifier.verify("Correct horse battery staple"));
        assert!(!verifier.verify(""));
    }

    #[test]
    fn test_debug_redacts() {
        let verifier = verifier();
        let output = format!("{verifier:?}");
        assert!(!output.contains("k3y-Material"));
        assert!(!output.contains("horse"));
    }
}
