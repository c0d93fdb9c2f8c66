//! In-process record store.
//!
//! Rows are kept as JSON documents per table with a per-table serial id, so
//! the store behaves like the Postgres one from the accessor's point of view:
//! ids grow with insertion order, `order_index` is whatever the caller wrote.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value as JsonValue;

use agency_core::{Placement, RecordId, SettingsKind, Stored, sort_ordered};

use super::records::PgRecord;
use super::{RecordStore, RepositoryError, SettingDocument};

#[derive(Debug, Clone)]
struct Row {
    id: RecordId,
    order_index: i32,
    value: JsonValue,
}

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<Row>>,
    serials: HashMap<&'static str, i32>,
    settings: HashMap<SettingsKind, SettingDocument>,
}

/// Record store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the backend were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.check_available()?;
        self.tables
            .read()
            .map_err(|_| RepositoryError::DataCorruption("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.check_available()?;
        self.tables
            .write()
            .map_err(|_| RepositoryError::DataCorruption("memory store lock poisoned".to_string()))
    }
}

fn to_stored<R: PgRecord>(row: &Row) -> Result<Stored<R>, RepositoryError> {
    let record = serde_json::from_value(row.value.clone()).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid {} row: {e}", R::COLLECTION))
    })?;
    Ok(Stored {
        id: row.id,
        order_index: row.order_index,
        record,
    })
}

fn to_value<R: PgRecord>(record: &R) -> Result<JsonValue, RepositoryError> {
    serde_json::to_value(record)
        .map_err(|e| RepositoryError::DataCorruption(format!("unserializable record: {e}")))
}

impl RecordStore for MemoryStore {
    async fn select_ordered<R: PgRecord>(&self) -> Result<Vec<Stored<R>>, RepositoryError> {
        let tables = self.read()?;
        let mut items = tables
            .rows
            .get(R::table())
            .map(|rows| rows.iter().map(to_stored::<R>).collect::<Result<Vec<_>, _>>())
            .transpose()?
            .unwrap_or_default();
        sort_ordered(&mut items);
        Ok(items)
    }

    async fn count<R: PgRecord>(&self) -> Result<usize, RepositoryError> {
        let tables = self.read()?;
        Ok(tables.rows.get(R::table()).map_or(0, Vec::len))
    }

    async fn insert<R: PgRecord>(
        &self,
        order_index: i32,
        record: &R,
    ) -> Result<Stored<R>, RepositoryError> {
        let value = to_value(record)?;
        let mut tables = self.write()?;

        let serial = tables.serials.entry(R::table()).or_insert(0);
        *serial += 1;
        let row = Row {
            id: RecordId::new(*serial),
            order_index,
            value,
        };

        let stored = to_stored(&row)?;
        tables.rows.entry(R::table()).or_default().push(row);
        Ok(stored)
    }

    async fn update<R: PgRecord>(
        &self,
        id: RecordId,
        record: &R,
    ) -> Result<Stored<R>, RepositoryError> {
        let value = to_value(record)?;
        let mut tables = self.write()?;
        let row = tables
            .rows
            .get_mut(R::table())
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
            .ok_or(RepositoryError::NotFound)?;
        row.value = value;
        to_stored(row)
    }

    async fn set_order_index<R: PgRecord>(
        &self,
        id: RecordId,
        order_index: i32,
    ) -> Result<Stored<R>, RepositoryError> {
        let mut tables = self.write()?;
        let row = tables
            .rows
            .get_mut(R::table())
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
            .ok_or(RepositoryError::NotFound)?;
        row.order_index = order_index;
        to_stored(row)
    }

    async fn delete<R: PgRecord>(&self, id: RecordId) -> Result<(), RepositoryError> {
        let mut tables = self.write()?;
        let rows = tables
            .rows
            .get_mut(R::table())
            .ok_or(RepositoryError::NotFound)?;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn move_order_indexes<R: PgRecord>(
        &self,
        placements: Vec<Placement>,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.write()?;
        let rows = tables.rows.entry(R::table()).or_default();

        // Check all before writing any, under the one write lock.
        for placement in &placements {
            let current = rows.iter().find(|r| r.id == placement.id);
            if current.map(|r| r.order_index) != Some(placement.from) {
                return Err(RepositoryError::Conflict(format!(
                    "{} {} no longer at position {}",
                    R::COLLECTION,
                    placement.id,
                    placement.from
                )));
            }
        }
        for placement in &placements {
            if let Some(row) = rows.iter_mut().find(|r| r.id == placement.id) {
                row.order_index = placement.to;
            }
        }
        Ok(())
    }

    async fn load_setting(
        &self,
        kind: SettingsKind,
    ) -> Result<Option<SettingDocument>, RepositoryError> {
        Ok(self.read()?.settings.get(&kind).cloned())
    }

    async fn save_setting(
        &self,
        kind: SettingsKind,
        value: &JsonValue,
    ) -> Result<SettingDocument, RepositoryError> {
        let document = SettingDocument {
            value: value.clone(),
            updated_at: Utc::now(),
        };
        self.write()?.settings.insert(kind, document.clone());
        Ok(document)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}
