use twig_crypto::ContentHasher;
use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written: the same bytes always produce the
///   same ID, and an ID is never rebound to different bytes.
/// - The store never interprets object contents.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>>;

    /// Write an object and return its content-addressed ID.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    fn write(&self, data: &[u8]) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// The ID `data` would be stored under. Pure; touches no storage.
    fn hash(&self, data: &[u8]) -> ObjectId {
        ContentHasher::hash(data)
    }

    /// Read an object that must exist.
    ///
    /// Fails with [`StoreError::NotFound`] rather than returning empty content.
    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }

    /// Read multiple objects in a batch.
    fn read_batch(&self, ids: &[ObjectId]) -> StoreResult<Vec<Option<Vec<u8>>>> {
        ids.iter().map(|id| self.read(id)).collect()
    }

    /// Write multiple objects in a batch and return their IDs.
    fn write_batch(&self, objects: &[&[u8]]) -> StoreResult<Vec<ObjectId>> {
        objects.iter().map(|data| self.write(data)).collect()
    }
}
