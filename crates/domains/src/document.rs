//! # Document Model
//!
//! The minimal vocabulary the document store port speaks: schemaless JSON
//! documents, equality filters, single-field ordering and partial updates.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::StoreError;

/// A stored document body, keyed by field name.
pub type Document = Map<String, Value>;

/// A document read back from the store together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub data: Document,
}

impl Snapshot {
    pub fn new(id: impl Into<String>, data: Document) -> Self {
        Self { id: id.into(), data }
    }

    /// Deserializes the snapshot body into a domain type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.data.clone()))
            .map_err(|e| StoreError::Malformed(format!("{}: {e}", self.id)))
    }

    /// Looks up a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// Serializes a domain value into a document body.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Malformed(format!(
            "expected an object, got {other}"
        ))),
        Err(e) => Err(StoreError::Malformed(e.to_string())),
    }
}

/// `field == value`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A collection query. Filters are ANDed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document body satisfies every filter.
    pub fn matches(&self, data: &Document) -> bool {
        self.filters
            .iter()
            .all(|f| data.get(&f.field) == Some(&f.value))
    }
}

/// One field of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Set(Value),
    /// Removes the field from the document.
    Delete,
}

/// Partial update applied by [`crate::ports::DocumentStore::update`].
pub type Patch = BTreeMap<String, FieldValue>;

/// Applies a patch in place.
pub fn apply_patch(data: &mut Document, patch: &Patch) {
    for (field, change) in patch {
        match change {
            FieldValue::Set(value) => {
                data.insert(field.clone(), value.clone());
            }
            FieldValue::Delete => {
                data.remove(field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn query_requires_every_filter() {
        let query = Query::new()
            .where_eq("userId", "u1")
            .where_eq("boardName", "Algebra");

        assert!(query.matches(&doc(json!({"userId": "u1", "boardName": "Algebra"}))));
        assert!(!query.matches(&doc(json!({"userId": "u1", "boardName": "Biology"}))));
        assert!(!query.matches(&doc(json!({"userId": "u1"}))));
    }

    #[test]
    fn patch_sets_and_removes_fields() {
        let mut data = doc(json!({"image": "data:x", "drawing": [1]}));
        let mut patch = Patch::new();
        patch.insert("image".into(), FieldValue::Delete);
        patch.insert("drawing".into(), FieldValue::Set(json!([])));

        apply_patch(&mut data, &patch);

        assert_eq!(Value::Object(data), json!({"drawing": []}));
    }

    #[test]
    fn to_document_rejects_non_objects() {
        assert!(matches!(to_document(&42), Err(StoreError::Malformed(_))));
    }
}
