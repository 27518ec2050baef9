//! # In-memory document store
//!
//! `DashMap`-backed implementation of `DocumentStore`. Each collection sits
//! behind its own shard lock, so every call is atomic for the documents it
//! touches. Used by tests and as the backing map of the file store.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{apply_patch, Direction, Document, DocumentStore, Patch, Query, Snapshot, StoreError};
use serde_json::Value;
use uuid::Uuid;

/// Every collection, keyed by collection name then document id.
pub type Collections = BTreeMap<String, BTreeMap<String, Document>>;

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, BTreeMap<String, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a previously exported state.
    pub fn from_collections(collections: Collections) -> Self {
        Self {
            collections: collections.into_iter().collect(),
        }
    }

    /// Copies out the full contents.
    pub fn export(&self) -> Collections {
        self.collections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn allocate_id(&self, _collection: &str) -> String {
        Uuid::new_v4().simple().to_string()
    }

    async fn add(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let id = self.allocate_id(collection);
        self.set(collection, &id, doc).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        self.collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Snapshot>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).map(|doc| Snapshot::new(id, doc.clone()))))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Snapshot>, StoreError> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<Snapshot> = docs
            .iter()
            .filter(|(_, doc)| query.matches(doc))
            // Ordering by a field excludes documents that lack it.
            .filter(|(_, doc)| {
                query
                    .order_by
                    .as_ref()
                    .map_or(true, |order| doc.contains_key(&order.field))
            })
            .map(|(id, doc)| Snapshot::new(id.clone(), doc.clone()))
            .collect();
        drop(docs);

        if let Some(order) = &query.order_by {
            hits.sort_by(|a, b| {
                let ord = compare_values(a.field(&order.field), b.field(&order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            hits.truncate(limit);
        }
        Ok(hits)
    }

    async fn update(&self, collection: &str, id: &str, patch: Patch) -> Result<(), StoreError> {
        let missing = || StoreError::Missing {
            collection: collection.to_owned(),
            id: id.to_owned(),
        };
        let mut docs = self.collections.get_mut(collection).ok_or_else(missing)?;
        let doc = docs.get_mut(id).ok_or_else(missing)?;
        apply_patch(doc, &patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(mut docs) = self.collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

/// Total order over JSON values: null < bool < number < string < array < object.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
    };

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
