//! Record store boundary.
//!
//! A [`RecordStore`] persists the records of exactly one resource, described
//! by its [`ResourceDescriptor`]. Implementations must keep these semantics:
//!
//! - `create` validates the fields against the descriptor and returns the
//!   store-assigned id.
//! - `list_all` is recomputed on every call, newest first (id descending).
//! - `update`, `delete` and `decrement` never fail because the id is unknown;
//!   they report whether a row was affected instead.
//! - `decrement` lowers the descriptor's counter by one only while it is
//!   positive, as one atomic step (no read-then-write window).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use garage_core::{DomainError, Fields, Record, RecordId, ResourceDescriptor};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Deterministic domain failure (validation, not found, conflict).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The database reported a failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other storage fault (e.g. a poisoned lock).
    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Domain(DomainError::NotFound))
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The resource this store holds.
    fn descriptor(&self) -> &'static ResourceDescriptor;

    async fn create(&self, fields: Fields) -> StoreResult<RecordId>;

    async fn list_all(&self) -> StoreResult<Vec<Record>>;

    async fn get(&self, id: RecordId) -> StoreResult<Option<Record>>;

    /// Full overwrite of every field; `Ok(false)` when no record matched.
    async fn update(&self, id: RecordId, fields: Fields) -> StoreResult<bool>;

    /// `Ok(false)` when no record matched.
    async fn delete(&self, id: RecordId) -> StoreResult<bool>;

    /// Guarded decrement of the counter field.
    ///
    /// `Ok(false)` when the record is absent or the counter is already zero.
    /// Fails with a validation error if the resource declares no counter.
    async fn decrement(&self, id: RecordId) -> StoreResult<bool>;
}

#[async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn descriptor(&self) -> &'static ResourceDescriptor {
        (**self).descriptor()
    }

    async fn create(&self, fields: Fields) -> StoreResult<RecordId> {
        (**self).create(fields).await
    }

    async fn list_all(&self) -> StoreResult<Vec<Record>> {
        (**self).list_all().await
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<Record>> {
        (**self).get(id).await
    }

    async fn update(&self, id: RecordId, fields: Fields) -> StoreResult<bool> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        (**self).delete(id).await
    }

    async fn decrement(&self, id: RecordId) -> StoreResult<bool> {
        (**self).decrement(id).await
    }
}

pub(crate) fn no_counter(descriptor: &ResourceDescriptor) -> StoreError {
    StoreError::Domain(DomainError::validation(format!(
        "{} has no counter to decrement",
        descriptor.slug
    )))
}
