//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` in production (`admin.session`, created by
//! `agency-cli migrate`) and in memory under test. Either way the cookie is
//! `HttpOnly`, `SameSite=Strict`, and expires after 24 hours of inactivity.

use sqlx::PgPool;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "agency_admin_session";

/// Session schema and table.
pub const SESSION_SCHEMA: &str = "admin";
pub const SESSION_TABLE: &str = "session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Build the `PostgreSQL` session store.
///
/// # Errors
///
/// Returns the store's message if the schema or table name is rejected.
pub fn postgres_session_store(pool: &PgPool) -> Result<PostgresStore, String> {
    PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)?
        .with_table_name(SESSION_TABLE)
}

/// Create the session layer over any store.
///
/// `secure` sets the cookie's `Secure` flag; pass `true` when served over
/// HTTPS.
#[must_use]
pub fn create_session_layer<Store>(store: Store, secure: bool) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS)))
        .with_secure(secure)
        .with_same_site(SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
