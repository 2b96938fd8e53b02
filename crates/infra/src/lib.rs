//! Infrastructure layer: SQLite pool, record stores, user stores.

pub mod accounts;
pub mod db;
pub mod repository;
pub mod store;

pub use accounts::{InMemoryUserStore, SqliteUserStore, UserStore};
pub use repository::{Inventory, Posts, Repository};
pub use store::{InMemoryRecordStore, RecordStore, SqliteRecordStore, StoreError, StoreResult};
