//! In-memory record store for tests/dev.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use garage_core::{FieldValue, Fields, Record, RecordId, ResourceDescriptor, check};

use super::{RecordStore, StoreError, StoreResult, no_counter};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<RecordId, Fields>,
}

/// Process-local record store.
///
/// Ids are never reused, mirroring SQLite `AUTOINCREMENT`. The guarded
/// decrement runs entirely under the write lock.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    descriptor: &'static ResourceDescriptor,
    inner: RwLock<Table>,
}

impl InMemoryRecordStore {
    pub fn new(descriptor: &'static ResourceDescriptor) -> Self {
        Self {
            descriptor,
            inner: RwLock::new(Table::default()),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Storage("record table lock poisoned".to_string())
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    async fn create(&self, fields: Fields) -> StoreResult<RecordId> {
        let fields = check(self.descriptor, fields)?;
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        table.last_id += 1;
        let id = RecordId::new(table.last_id);
        table.rows.insert(id, fields);
        Ok(id)
    }

    async fn list_all(&self) -> StoreResult<Vec<Record>> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table
            .rows
            .iter()
            .rev()
            .map(|(id, fields)| Record {
                id: *id,
                fields: fields.clone(),
            })
            .collect())
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<Record>> {
        let table = self.inner.read().map_err(|_| poisoned())?;
        Ok(table.rows.get(&id).map(|fields| Record {
            id,
            fields: fields.clone(),
        }))
    }

    async fn update(&self, id: RecordId, fields: Fields) -> StoreResult<bool> {
        let fields = check(self.descriptor, fields)?;
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        match table.rows.get_mut(&id) {
            Some(slot) => {
                *slot = fields;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        let mut table = self.inner.write().map_err(|_| poisoned())?;
        Ok(table.rows.remove(&id).is_some())
    }

    async fn decrement(&self, id: RecordId) -> StoreResult<bool> {
        let counter = self
            .descriptor
            .counter_field()
            .ok_or_else(|| no_counter(self.descriptor))?;

        let mut table = self.inner.write().map_err(|_| poisoned())?;
        let Some(fields) = table.rows.get_mut(&id) else {
            return Ok(false);
        };

        match fields.get(counter.name).and_then(FieldValue::as_integer) {
            Some(n) if n > 0 => Ok(fields.set(counter.name, FieldValue::Integer(n - 1))),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use garage_blog::POSTS;
    use garage_core::DomainError;
    use garage_inventory::CARS;

    fn car(count: i64) -> Fields {
        Fields::new()
            .text("brand", "Toyota")
            .text("model", "Corolla")
            .integer("year", 2022)
            .integer("available_count", count)
    }

    fn count_of(record: &Record) -> i64 {
        record.fields.require_integer("available_count").unwrap()
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = InMemoryRecordStore::new(&CARS);
        let a = store.create(car(1)).await.unwrap();
        let b = store.create(car(2)).await.unwrap();
        let c = store.create(car(3)).await.unwrap();

        let ids: Vec<_> = store.list_all().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryRecordStore::new(&CARS);
        let a = store.create(car(1)).await.unwrap();
        assert!(store.delete(a).await.unwrap());
        let b = store.create(car(1)).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn update_of_missing_record_creates_nothing() {
        let store = InMemoryRecordStore::new(&CARS);
        assert!(!store.update(RecordId::new(5), car(1)).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_update_is_rejected() {
        let store = InMemoryRecordStore::new(&CARS);
        let id = store.create(car(1)).await.unwrap();
        let err = store.update(id, car(-3)).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
        assert_eq!(count_of(&store.get(id).await.unwrap().unwrap()), 1);
    }

    #[tokio::test]
    async fn decrement_on_zero_is_a_no_op() {
        let store = InMemoryRecordStore::new(&CARS);
        let id = store.create(car(0)).await.unwrap();
        assert!(!store.decrement(id).await.unwrap());
        assert_eq!(count_of(&store.get(id).await.unwrap().unwrap()), 0);
    }

    #[tokio::test]
    async fn posts_cannot_be_decremented() {
        let store = InMemoryRecordStore::new(&POSTS);
        assert!(store.decrement(RecordId::new(1)).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_decrements_never_go_negative() {
        let store = Arc::new(InMemoryRecordStore::new(&CARS));
        let id = store.create(car(10)).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.decrement(id).await.unwrap() })
            })
            .collect();

        let mut applied = 0;
        for h in handles {
            if h.await.unwrap() {
                applied += 1;
            }
        }

        assert_eq!(applied, 10);
        assert_eq!(count_of(&store.get(id).await.unwrap().unwrap()), 0);
    }
}
