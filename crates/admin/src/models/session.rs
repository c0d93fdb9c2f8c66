//! Session-stored admin state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Longest an admin session lives, however active it is.
pub const MAX_SESSION_AGE: Duration = Duration::hours(24);

/// Marker stored in the session after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub logged_in_at: DateTime<Utc>,
}

impl AdminSession {
    /// Whether the session is still within [`MAX_SESSION_AGE`] at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.logged_in_at) < MAX_SESSION_AGE
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the [`super::AdminSession`] marker.
    pub const ADMIN: &str = "admin";
}
