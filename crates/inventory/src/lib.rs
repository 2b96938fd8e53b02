//! Car inventory domain module.
//!
//! Pure domain types for the car inventory: the record shape, the draft used
//! by create/update, and the declarative descriptor the storage and HTTP
//! layers are driven by (no IO, no HTTP, no storage).

pub mod car;

pub use car::{CARS, CarDraft, InventoryRecord};
