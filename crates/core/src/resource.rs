//! Declarative resource descriptors.
//!
//! A [`ResourceDescriptor`] is the single source of truth for one CRUD
//! resource: its URL slug, its SQL table, its ordered field list and the
//! optional guarded counter. Storage statements, schema, validation and
//! views are all derived from it, so adding a resource is a matter of
//! declaring a new descriptor.

use serde::Serialize;

use crate::error::DomainResult;
use crate::id::RecordId;
use crate::validation::Fields;

/// Kind of value a field holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Non-empty text.
    Text,
    /// Any 64-bit integer.
    Integer,
    /// Integer that must never be negative.
    Count,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Count)
    }

    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Text => "TEXT",
            FieldKind::Integer | FieldKind::Count => "INTEGER",
        }
    }
}

/// One column/form field of a resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: FieldKind::Text }
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: FieldKind::Integer }
    }

    pub const fn count(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: FieldKind::Count }
    }
}

/// Declarative description of a CRUD resource.
#[derive(Debug, Serialize)]
pub struct ResourceDescriptor {
    /// URL segment the resource is mounted under (e.g. `carros`).
    pub slug: &'static str,
    /// SQL table name.
    pub table: &'static str,
    /// Human-readable title used by views.
    pub title: &'static str,
    /// Ordered field list; `id` is implicit.
    pub fields: &'static [FieldSpec],
    /// Name of a `Count` field that supports the guarded decrement.
    pub counter: Option<&'static str>,
}

impl ResourceDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The guarded counter field, if the resource declares one.
    ///
    /// A counter naming a missing or non-`Count` field is ignored.
    pub fn counter_field(&self) -> Option<&FieldSpec> {
        let name = self.counter?;
        self.field(name).filter(|f| f.kind == FieldKind::Count)
    }

    pub fn column_list(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Idempotent `CREATE TABLE` statement for this resource.
    pub fn create_table_sql(&self) -> String {
        let mut columns = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
        for f in self.fields {
            let mut col = format!("{} {} NOT NULL", f.name, f.kind.sql_type());
            if f.kind == FieldKind::Count {
                col.push_str(&format!(" CHECK ({} >= 0)", f.name));
            }
            columns.push(col);
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            self.table,
            columns.join(",\n  ")
        )
    }
}

/// Untyped stored record: the store-assigned id plus the validated fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub fields: Fields,
}

/// A typed resource backed by a descriptor.
///
/// Typed drafts are lowered to [`Fields`] and re-checked by the validation
/// gate before they reach a store, so the store never sees a value that
/// breaks the descriptor (e.g. a negative count).
pub trait Resource: Sized + Send + Sync + 'static {
    const DESCRIPTOR: &'static ResourceDescriptor;

    /// Mutable part of the resource (everything but the id).
    type Draft: Send;

    fn into_fields(draft: Self::Draft) -> Fields;

    fn from_record(record: Record) -> DomainResult<Self>;
}
