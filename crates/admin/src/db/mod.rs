//! Content persistence.
//!
//! # Database: `agency_content`
//!
//! ## Tables
//!
//! - `team_members`, `team_categories`, `services`, `clients`,
//!   `portfolio_items`, `gallery_items`, `job_listings` - ordered collections,
//!   each row carrying `id SERIAL` and `order_index INTEGER`
//! - `site_settings` - singleton documents (JSONB) keyed by kind
//! - `admin.session` - tower-sessions store
//!
//! # Store abstraction
//!
//! [`RecordStore`] is the select/insert/update/delete surface the rest of the
//! crate talks to. [`PgStore`] is the production implementation;
//! [`MemoryStore`] backs tests and local demos. Ordering rules live in
//! [`collection::OrderedCollection`], not in the stores.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p agency-cli -- migrate
//! ```

pub mod collection;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod settings;

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use agency_core::{Placement, RecordId, SettingsKind, Stored, ValidationError};

pub use collection::OrderedCollection;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use records::PgRecord;
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A conditional write lost a race with another writer.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Request payload does not decode into the target type.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Record failed field validation.
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
}

/// A stored settings document.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDocument {
    pub value: JsonValue,
    pub updated_at: DateTime<Utc>,
}

/// Select/insert/update/delete surface over the content backend.
///
/// Stores know nothing about ordering rules: they persist what they are
/// given. The one multi-row write, [`RecordStore::move_order_indexes`], is
/// atomic and conditional.
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// All rows of a collection, ordered by `(order_index, id)`.
    fn select_ordered<R: PgRecord>(
        &self,
    ) -> impl Future<Output = Result<Vec<Stored<R>>, RepositoryError>> + Send;

    /// Number of rows in a collection.
    fn count<R: PgRecord>(&self) -> impl Future<Output = Result<usize, RepositoryError>> + Send;

    /// Insert a row; the store assigns the id.
    fn insert<R: PgRecord>(
        &self,
        order_index: i32,
        record: &R,
    ) -> impl Future<Output = Result<Stored<R>, RepositoryError>> + Send;

    /// Replace a row's domain fields, keeping its `order_index`.
    fn update<R: PgRecord>(
        &self,
        id: RecordId,
        record: &R,
    ) -> impl Future<Output = Result<Stored<R>, RepositoryError>> + Send;

    /// Reassign a row's `order_index`.
    fn set_order_index<R: PgRecord>(
        &self,
        id: RecordId,
        order_index: i32,
    ) -> impl Future<Output = Result<Stored<R>, RepositoryError>> + Send;

    /// Hard-delete a row.
    fn delete<R: PgRecord>(
        &self,
        id: RecordId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Apply every placement in one atomic step.
    ///
    /// Each write only applies if the row still holds `from`; otherwise
    /// nothing is written and `RepositoryError::Conflict` is returned.
    fn move_order_indexes<R: PgRecord>(
        &self,
        placements: Vec<Placement>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Load a settings document.
    fn load_setting(
        &self,
        kind: SettingsKind,
    ) -> impl Future<Output = Result<Option<SettingDocument>, RepositoryError>> + Send;

    /// Insert or replace a settings document.
    fn save_setting(
        &self,
        kind: SettingsKind,
        value: &JsonValue,
    ) -> impl Future<Output = Result<SettingDocument, RepositoryError>> + Send;

    /// Cheap connectivity check for readiness probes.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the embedded content migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
