//! Column mappings for the ordered collection tables.
//!
//! Decoding goes through the `sqlx::FromRow` derives on the core entities;
//! this module only supplies the domain column list and the matching binds
//! used by inserts and full-record updates.

use sqlx::Postgres;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;

use agency_core::{
    Category, Client, GalleryItem, JobListing, PortfolioItem, Record, Service, TeamMember,
};

/// Query type used for binding domain columns.
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A [`Record`] persisted in its own Postgres table.
pub trait PgRecord: Record + for<'r> sqlx::FromRow<'r, PgRow> {
    /// Domain columns, in the order [`PgRecord::bind_columns`] binds them.
    const COLUMNS: &'static [&'static str];

    /// Bind the domain fields, in [`PgRecord::COLUMNS`] order.
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;

    /// Backing table name.
    #[must_use]
    fn table() -> &'static str {
        Self::COLLECTION.table()
    }
}

impl PgRecord for TeamMember {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "role",
        "bio",
        "category",
        "image_url",
        "linkedin_url",
        "twitter_url",
    ];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.name)
            .bind(&self.role)
            .bind(&self.bio)
            .bind(self.category.as_deref())
            .bind(self.image_url.as_deref())
            .bind(self.linkedin_url.as_deref())
            .bind(self.twitter_url.as_deref())
    }
}

impl PgRecord for Category {
    const COLUMNS: &'static [&'static str] = &["name"];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.name)
    }
}

impl PgRecord for Service {
    const COLUMNS: &'static [&'static str] = &["title", "description", "icon"];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.title)
            .bind(&self.description)
            .bind(&self.icon)
    }
}

impl PgRecord for Client {
    const COLUMNS: &'static [&'static str] = &["name", "logo_url", "website_url"];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.name)
            .bind(self.logo_url.as_deref())
            .bind(self.website_url.as_deref())
    }
}

impl PgRecord for PortfolioItem {
    const COLUMNS: &'static [&'static str] =
        &["title", "category", "description", "image_url", "project_url"];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.title)
            .bind(&self.category)
            .bind(&self.description)
            .bind(self.image_url.as_deref())
            .bind(self.project_url.as_deref())
    }
}

impl PgRecord for GalleryItem {
    const COLUMNS: &'static [&'static str] = &[
        "media_type",
        "src",
        "video_src",
        "title",
        "category",
        "description",
    ];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.media_type)
            .bind(&self.src)
            .bind(self.video_src.as_deref())
            .bind(&self.title)
            .bind(&self.category)
            .bind(&self.description)
    }
}

impl PgRecord for JobListing {
    const COLUMNS: &'static [&'static str] =
        &["title", "location", "employment_type", "description"];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.title)
            .bind(&self.location)
            .bind(self.employment_type)
            .bind(&self.description)
    }
}

/// `INSERT ... RETURNING *` for a record type.
///
/// `$1` is `order_index`, domain columns follow.
#[must_use]
pub fn insert_sql<R: PgRecord>() -> String {
    let columns = R::COLUMNS.join(", ");
    let placeholders = (2..=R::COLUMNS.len() + 1)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} (order_index, {columns}) VALUES ($1, {placeholders}) RETURNING *",
        table = R::table(),
    )
}

/// Full-record `UPDATE ... RETURNING *` for a record type.
///
/// `$1` is the id, domain columns follow.
#[must_use]
pub fn update_sql<R: PgRecord>() -> String {
    let assignments = R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {table} SET {assignments}, updated_at = NOW() WHERE id = $1 RETURNING *",
        table = R::table(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_binds_order_index_first() {
        assert_eq!(
            insert_sql::<Client>(),
            "INSERT INTO clients (order_index, name, logo_url, website_url) \
             VALUES ($1, $2, $3, $4) RETURNING *"
        );
    }

    #[test]
    fn test_update_sql_binds_id_first() {
        assert_eq!(
            update_sql::<Service>(),
            "UPDATE services SET title = $2, description = $3, icon = $4, \
             updated_at = NOW() WHERE id = $1 RETURNING *"
        );
    }

    #[test]
    fn test_single_column_record() {
        assert_eq!(
            insert_sql::<Category>(),
            "INSERT INTO team_categories (order_index, name) VALUES ($1, $2) RETURNING *"
        );
    }
}
