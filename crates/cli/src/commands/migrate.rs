//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! agency-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Content migrations live in `crates/admin/migrations/`. The session table
//! is owned by `tower-sessions-sqlx-store` and created after them.

use agency_admin::db;
use agency_admin::middleware::postgres_session_store;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Session store error: {0}")]
    SessionStore(String),
}

/// Run content migrations, then create the session table.
///
/// # Errors
///
/// Returns an error if the database URL is missing or any migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url =
        super::database_url().ok_or(MigrationError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running content migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Creating session table...");
    postgres_session_store(&pool)
        .map_err(MigrationError::SessionStore)?
        .migrate()
        .await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
