use serde::{Deserialize, Serialize};

use garage_core::{DomainResult, FieldSpec, Fields, Record, RecordId, Resource, ResourceDescriptor};

/// Descriptor for the car inventory (`/carros`, table `carros`).
///
/// `available_count` is the guarded counter decremented by a sale.
pub static CARS: ResourceDescriptor = ResourceDescriptor {
    slug: "carros",
    table: "carros",
    title: "Cars",
    fields: &[
        FieldSpec::text("brand", "Brand"),
        FieldSpec::text("model", "Model"),
        FieldSpec::integer("year", "Year"),
        FieldSpec::count("available_count", "Available"),
    ],
    counter: Some("available_count"),
};

/// A car in the inventory.
///
/// # Invariants
/// - `id` is assigned by the store and never changes.
/// - `available_count >= 0` at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: RecordId,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub available_count: i64,
}

impl InventoryRecord {
    pub fn in_stock(&self) -> bool {
        self.available_count > 0
    }
}

/// Mutable part of an inventory record, used by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub available_count: i64,
}

impl CarDraft {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i64,
        available_count: i64,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year,
            available_count,
        }
    }
}

impl Resource for InventoryRecord {
    const DESCRIPTOR: &'static ResourceDescriptor = &CARS;

    type Draft = CarDraft;

    fn into_fields(draft: CarDraft) -> Fields {
        Fields::new()
            .text("brand", draft.brand)
            .text("model", draft.model)
            .integer("year", draft.year)
            .integer("available_count", draft.available_count)
    }

    fn from_record(record: Record) -> DomainResult<Self> {
        let f = &record.fields;
        Ok(Self {
            id: record.id,
            brand: f.require_text("brand")?,
            model: f.require_text("model")?,
            year: f.require_integer("year")?,
            available_count: f.require_integer("available_count")?,
        })
    }
}
