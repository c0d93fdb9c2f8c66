//! `PostgreSQL` record store.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use agency_core::{Placement, RecordId, SettingsKind, Stored};

use super::records::{PgRecord, insert_sql, update_sql};
use super::{RecordStore, RepositoryError, SettingDocument};

/// Record store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode<R: PgRecord>(row: &sqlx::postgres::PgRow) -> Result<Stored<R>, RepositoryError> {
    Stored::<R>::from_row(row).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid {} row: {e}", R::COLLECTION))
    })
}

impl RecordStore for PgStore {
    #[instrument(skip(self), fields(table = R::table()))]
    async fn select_ordered<R: PgRecord>(&self) -> Result<Vec<Stored<R>>, RepositoryError> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY order_index ASC, id ASC",
            R::table()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(decode::<R>).collect()
    }

    #[instrument(skip(self), fields(table = R::table()))]
    async fn count<R: PgRecord>(&self) -> Result<usize, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::table());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        usize::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative row count {count}")))
    }

    #[instrument(skip(self, record), fields(table = R::table()))]
    async fn insert<R: PgRecord>(
        &self,
        order_index: i32,
        record: &R,
    ) -> Result<Stored<R>, RepositoryError> {
        let sql = insert_sql::<R>();
        let query = record.bind_columns(sqlx::query(&sql).bind(order_index));
        let row = query.fetch_one(&self.pool).await?;
        decode(&row)
    }

    #[instrument(skip(self, record), fields(table = R::table()))]
    async fn update<R: PgRecord>(
        &self,
        id: RecordId,
        record: &R,
    ) -> Result<Stored<R>, RepositoryError> {
        let sql = update_sql::<R>();
        let query = record.bind_columns(sqlx::query(&sql).bind(id));
        let row = query
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        decode(&row)
    }

    #[instrument(skip(self), fields(table = R::table()))]
    async fn set_order_index<R: PgRecord>(
        &self,
        id: RecordId,
        order_index: i32,
    ) -> Result<Stored<R>, RepositoryError> {
        let sql = format!(
            "UPDATE {} SET order_index = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            R::table()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(order_index)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        decode(&row)
    }

    #[instrument(skip(self), fields(table = R::table()))]
    async fn delete<R: PgRecord>(&self, id: RecordId) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(table = R::table()))]
    async fn move_order_indexes<R: PgRecord>(
        &self,
        placements: Vec<Placement>,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "UPDATE {} SET order_index = $3, updated_at = NOW() \
             WHERE id = $1 AND order_index = $2",
            R::table()
        );

        let mut tx = self.pool.begin().await?;
        for placement in placements {
            let result = sqlx::query(&sql)
                .bind(placement.id)
                .bind(placement.from)
                .bind(placement.to)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() != 1 {
                tx.rollback().await?;
                return Err(RepositoryError::Conflict(format!(
                    "{} {} no longer at position {}",
                    R::COLLECTION,
                    placement.id,
                    placement.from
                )));
            }
        }
        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_setting(
        &self,
        kind: SettingsKind,
    ) -> Result<Option<SettingDocument>, RepositoryError> {
        let row: Option<(JsonValue, DateTime<Utc>)> =
            sqlx::query_as("SELECT value, updated_at FROM site_settings WHERE key = $1")
                .bind(kind.key())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value, updated_at)| SettingDocument { value, updated_at }))
    }

    #[instrument(skip(self, value))]
    async fn save_setting(
        &self,
        kind: SettingsKind,
        value: &JsonValue,
    ) -> Result<SettingDocument, RepositoryError> {
        let (value, updated_at): (JsonValue, DateTime<Utc>) = sqlx::query_as(
            r"
            INSERT INTO site_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING value, updated_at
            ",
        )
        .bind(kind.key())
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(SettingDocument { value, updated_at })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
