//! Ordered collection accessor.
//!
//! Every managed collection goes through [`OrderedCollection`]: list in
//! `(order_index, id)` order, append at the tail, full-record update, hard
//! delete, and one-step reorder.

use std::marker::PhantomData;

use tracing::{info, instrument, warn};

use agency_core::{
    Direction, RecordId, ReorderPlan, Stored, next_order_index, plan_reorder, sort_ordered,
};

use super::records::PgRecord;
use super::{RecordStore, RepositoryError};

/// How many times a reorder re-reads and retries after losing a race.
pub const MAX_REORDER_ATTEMPTS: usize = 3;

/// Accessor for one ordered collection.
pub struct OrderedCollection<'a, S, R> {
    store: &'a S,
    _record: PhantomData<fn() -> R>,
}

impl<'a, S, R> OrderedCollection<'a, S, R>
where
    S: RecordStore,
    R: PgRecord,
{
    /// Create an accessor over `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// All records in display order.
    ///
    /// # Errors
    ///
    /// Returns the store error when the query fails. Callers must treat this
    /// as "not loaded", never as an empty collection.
    pub async fn list(&self) -> Result<Vec<Stored<R>>, RepositoryError> {
        let mut items = self.store.select_ordered::<R>().await?;
        sort_ordered(&mut items);
        Ok(items)
    }

    /// A single record by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn get(&self, id: RecordId) -> Result<Stored<R>, RepositoryError> {
        self.list()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(RepositoryError::NotFound)
    }

    /// Append a record at the tail.
    ///
    /// The new `order_index` is the row count read just before the insert.
    /// Nothing isolates the two steps, so concurrent appends can share an
    /// `order_index`; the id then decides their order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if a required field is blank, or
    /// the store error.
    #[instrument(skip(self, record), fields(collection = %R::COLLECTION))]
    pub async fn append(&self, record: R) -> Result<Stored<R>, RepositoryError> {
        record.validate()?;
        let order_index = next_order_index(self.store.count::<R>().await?);
        let stored = self.store.insert(order_index, &record).await?;
        info!(id = %stored.id, order_index, "record appended");
        Ok(stored)
    }

    /// Replace a record's fields. Its position is kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a blank required field,
    /// `RepositoryError::NotFound` for an unknown id, or the store error.
    #[instrument(skip(self, record), fields(collection = %R::COLLECTION))]
    pub async fn update(&self, id: RecordId, record: R) -> Result<Stored<R>, RepositoryError> {
        record.validate()?;
        let stored = self.store.update(id, &record).await?;
        info!(%id, "record updated");
        Ok(stored)
    }

    /// Put a record at an explicit `order_index`. Other records are untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id, or the store error.
    #[instrument(skip(self), fields(collection = %R::COLLECTION))]
    pub async fn set_order_index(
        &self,
        id: RecordId,
        order_index: i32,
    ) -> Result<Stored<R>, RepositoryError> {
        self.store.set_order_index(id, order_index).await
    }

    /// Hard-delete a record. Records that reference it are not touched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id, or the store error.
    #[instrument(skip(self), fields(collection = %R::COLLECTION))]
    pub async fn remove(&self, id: RecordId) -> Result<(), RepositoryError> {
        self.store.delete::<R>(id).await?;
        info!(%id, "record removed");
        Ok(())
    }

    /// Move a record one step and return the collection in its new order.
    ///
    /// The record exchanges `order_index` values with its neighbour, or, when
    /// the two are tied, the run from the pair onwards is renumbered. All
    /// writes land in one conditional step. If another writer moved any of
    /// those records in the meantime the step is refused; the list is re-read
    /// and the move planned again, up to [`MAX_REORDER_ATTEMPTS`] times. Moving the first record up
    /// or the last record down changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id,
    /// `RepositoryError::Conflict` when every attempt lost a race, or the
    /// store error.
    #[instrument(skip(self), fields(collection = %R::COLLECTION))]
    pub async fn reorder(
        &self,
        id: RecordId,
        direction: Direction,
    ) -> Result<Vec<Stored<R>>, RepositoryError> {
        for attempt in 1..=MAX_REORDER_ATTEMPTS {
            let items = self.list().await?;
            let plan = plan_reorder(&items, id, direction).ok_or(RepositoryError::NotFound)?;

            let ReorderPlan::Move { placements } = plan else {
                return Ok(items);
            };

            let writes = placements.len();
            match self.store.move_order_indexes::<R>(placements).await {
                Ok(()) => {
                    info!(%id, writes, ?direction, "record reordered");
                    return self.list().await;
                }
                Err(RepositoryError::Conflict(reason)) => {
                    warn!(%id, attempt, %reason, "reorder lost a race, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(RepositoryError::Conflict(format!(
            "{} {id} kept moving; gave up after {MAX_REORDER_ATTEMPTS} attempts",
            R::COLLECTION
        )))
    }
}
