//! Validation gate for create/update requests.
//!
//! Every write goes through [`validate`] (raw form input) or [`check`]
//! (typed drafts lowered to [`Fields`]) before it reaches a store.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::resource::{FieldKind, ResourceDescriptor};

/// Raw submitted form, as decoded from `application/x-www-form-urlencoded`.
pub type FormInput = HashMap<String, String>;

/// A single validated field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}

impl core::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(v) => write!(f, "{v}"),
        }
    }
}

/// Ordered, named field values of one record.
///
/// Serializes as a map (`{"brand": "Toyota", "year": 2022}`) so views can
/// address values by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(&'static str, FieldValue)>);

impl Fields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.push((name, FieldValue::Text(value.into())));
        self
    }

    pub fn integer(mut self, name: &'static str, value: i64) -> Self {
        self.0.push((name, FieldValue::Integer(value)));
        self
    }

    pub fn push(&mut self, name: &'static str, value: FieldValue) {
        self.0.push((name, value));
    }

    /// Replace the value of an existing field; returns `false` if absent.
    pub fn set(&mut self, name: &str, value: FieldValue) -> bool {
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Text value of `name`, or a validation error when absent/mistyped.
    pub fn require_text(&self, name: &str) -> DomainResult<String> {
        self.get(name)
            .and_then(FieldValue::as_text)
            .map(str::to_string)
            .ok_or_else(|| DomainError::validation(format!("field `{name}` must be text")))
    }

    /// Integer value of `name`, or a validation error when absent/mistyped.
    pub fn require_integer(&self, name: &str) -> DomainResult<i64> {
        self.get(name)
            .and_then(FieldValue::as_integer)
            .ok_or_else(|| DomainError::validation(format!("field `{name}` must be an integer")))
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (*k, v)))
    }
}

/// Validate a submitted form against a descriptor.
///
/// Every declared field must be present and non-empty; numeric fields must
/// parse as integers and `Count` fields must not be negative. Text values
/// are trimmed. Unknown form keys are ignored.
pub fn validate(descriptor: &ResourceDescriptor, form: &FormInput) -> DomainResult<Fields> {
    let mut fields = Fields::new();

    for spec in descriptor.fields {
        let raw = form
            .get(spec.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                DomainError::validation(format!("fill in all fields (missing `{}`)", spec.name))
            })?;

        let value = match spec.kind {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Integer | FieldKind::Count => {
                let n = raw.parse::<i64>().map_err(|_| {
                    DomainError::validation(format!("field `{}` must be an integer", spec.name))
                })?;
                FieldValue::Integer(n)
            }
        };
        fields.push(spec.name, value);
    }

    check(descriptor, fields)
}

/// Re-check already-typed fields against a descriptor.
///
/// Fields must appear in declaration order with matching kinds.
pub fn check(descriptor: &ResourceDescriptor, fields: Fields) -> DomainResult<Fields> {
    if fields.len() != descriptor.fields.len() {
        return Err(DomainError::validation(format!(
            "{} expects {} fields, got {}",
            descriptor.slug,
            descriptor.fields.len(),
            fields.len()
        )));
    }

    for (spec, (name, value)) in descriptor.fields.iter().zip(fields.0.iter()) {
        if spec.name != *name {
            return Err(DomainError::validation(format!(
                "expected field `{}`, got `{name}`",
                spec.name
            )));
        }

        match (spec.kind, value) {
            (FieldKind::Text, FieldValue::Text(s)) => {
                if s.trim().is_empty() {
                    return Err(DomainError::validation(format!(
                        "field `{name}` cannot be empty"
                    )));
                }
            }
            (FieldKind::Integer, FieldValue::Integer(_)) => {}
            (FieldKind::Count, FieldValue::Integer(n)) => {
                if *n < 0 {
                    return Err(DomainError::validation(format!(
                        "field `{name}` cannot be negative"
                    )));
                }
            }
            _ => {
                return Err(DomainError::validation(format!(
                    "field `{name}` has the wrong kind"
                )));
            }
        }
    }

    Ok(fields)
}
