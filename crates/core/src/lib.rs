//! `garage-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model, declarative resource descriptors and the
//! validation gate that every create/update form passes through.

pub mod error;
pub mod id;
pub mod resource;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use resource::{FieldKind, FieldSpec, Record, Resource, ResourceDescriptor};
pub use validation::{FieldValue, Fields, FormInput, check, validate};
