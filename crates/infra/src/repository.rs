//! Typed access to a record store, for library callers and benchmarks.
//!
//! The HTTP layer is descriptor-driven and talks to [`RecordStore`] directly;
//! code that knows its resource at compile time (tools, seeding, the store
//! benchmarks) goes through [`Repository`] instead and gets `InventoryRecord`
//! or `BlogPost` values back.

use std::marker::PhantomData;

use garage_blog::BlogPost;
use garage_core::{DomainError, RecordId, Resource};
use garage_inventory::InventoryRecord;

use crate::store::{RecordStore, StoreResult};

/// Typed view of a [`RecordStore`] for resource `R`.
///
/// Translates drafts into fields and records back into `R`. The store keeps
/// all semantics (validation, ordering, silent no-ops on unknown ids).
pub struct Repository<R, S> {
    store: S,
    _resource: PhantomData<fn() -> R>,
}

/// Car inventory repository.
pub type Inventory<S> = Repository<InventoryRecord, S>;

/// Blog post repository.
pub type Posts<S> = Repository<BlogPost, S>;

impl<R, S> Repository<R, S>
where
    R: Resource,
    S: RecordStore,
{
    /// Wrap `store`, which must hold `R`'s resource.
    pub fn new(store: S) -> Result<Self, DomainError> {
        if !std::ptr::eq(store.descriptor(), R::DESCRIPTOR) {
            return Err(DomainError::validation(format!(
                "store holds `{}`, expected `{}`",
                store.descriptor().slug,
                R::DESCRIPTOR.slug
            )));
        }
        Ok(Self {
            store,
            _resource: PhantomData,
        })
    }

    pub async fn create(&self, draft: R::Draft) -> StoreResult<RecordId> {
        self.store.create(R::into_fields(draft)).await
    }

    /// Every record, newest first.
    pub async fn list_all(&self) -> StoreResult<Vec<R>> {
        let records = self.store.list_all().await?;
        Ok(records
            .into_iter()
            .map(R::from_record)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Fails with `NotFound` when no record has `id`.
    pub async fn get(&self, id: RecordId) -> StoreResult<R> {
        let record = self.store.get(id).await?.ok_or(DomainError::NotFound)?;
        Ok(R::from_record(record)?)
    }

    /// Full overwrite; `Ok(false)` (not an error) when `id` is unknown.
    pub async fn update(&self, id: RecordId, draft: R::Draft) -> StoreResult<bool> {
        self.store.update(id, R::into_fields(draft)).await
    }

    /// Idempotent; `Ok(false)` when `id` is unknown.
    pub async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        self.store.delete(id).await
    }
}

impl<S: RecordStore> Repository<InventoryRecord, S> {
    /// Sell one unit: decrement `available_count` if it is positive.
    ///
    /// Unknown ids and sold-out records complete with `Ok(false)`.
    pub async fn sell(&self, id: RecordId) -> StoreResult<bool> {
        self.store.decrement(id).await
    }
}
