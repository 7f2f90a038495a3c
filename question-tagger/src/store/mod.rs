use crate::completion::BoxFuture;
use crate::errors::StoreError;
use crate::record::{InsertedId, StoredRecord};

/// Schema-less document store holding tagged questions.
///
/// Implementations assign an identifier on insert and expose it as `_id`
/// on the records they return.
pub trait DocumentStore: Send + Sync {
    /// Persists one record and returns the store-generated identifier.
    fn insert_one(&self, record: StoredRecord) -> BoxFuture<'_, Result<InsertedId, StoreError>>;

    /// Up to `limit` records in the store's natural order. `0` yields nothing.
    fn find_first(&self, limit: u64) -> BoxFuture<'_, Result<Vec<StoredRecord>, StoreError>>;

    /// Round-trip check against the backend.
    fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>>;
}

#[cfg(any(test, feature = "testing"))]
pub mod in_memory;
pub mod mongo;
