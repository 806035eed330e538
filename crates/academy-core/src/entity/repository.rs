//! Entity repository trait.
//!
//! Defines the interface shared by the player, coach, event and group
//! collections.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::Entity;
use crate::error::Result;
use crate::store::StorageEvent;

/// An abstract repository for one entity collection.
///
/// Every mutation rewrites the whole collection; the last writer wins.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Schema versioning and migrations of the stored array
/// - Reporting corrupt data as an error instead of an empty collection
/// - Publishing a [`StorageEvent`] after every successful mutation
#[async_trait]
pub trait EntityRepository<T: Entity>: Send + Sync {
    /// Lists every record in stored order.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<T>)`: All records; empty when the collection was never written
    /// - `Err(AcademyError)`: The stored collection is unreadable
    async fn list(&self) -> Result<Vec<T>>;

    /// Finds a record by its id.
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Appends a record.
    ///
    /// An empty id is replaced by a generated one. Fails with
    /// `AcademyError::Duplicate` when the id is already taken.
    ///
    /// # Returns
    ///
    /// The stored record, with its final id.
    async fn add(&self, entity: T) -> Result<T>;

    /// Applies a partial update to the record with the given id.
    ///
    /// Fails with `AcademyError::NotFound` when no record has that id, and
    /// with `AcademyError::Validation` when the patched record does not pass
    /// [`Entity::validate`]; nothing is written in either case.
    async fn update(&self, id: &str, patch: T::Patch) -> Result<T>;

    /// Removes the record with the given id.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The record existed and was removed
    /// - `Ok(false)`: No record had that id; nothing was written
    async fn remove(&self, id: &str) -> Result<bool>;

    /// Overwrites the whole collection.
    async fn replace_all(&self, items: Vec<T>) -> Result<()>;

    /// Subscribes to changes of this collection's storage key only.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
