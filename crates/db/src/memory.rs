//! In-process document store.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::{document_id, Document, DocumentStore, Filter, Sort, StoreError};

#[derive(Default)]
struct Collection {
    docs: Vec<Document>,
    unique_fields: Vec<String>,
}

impl Collection {
    fn position(&self, id: &str) -> Option<usize> {
        self.docs.iter().position(|doc| document_id(doc) == Some(id))
    }

    /// Unique-field violation `doc` would introduce, ignoring the document
    /// stored under `skip_id`.
    fn conflicting_field(&self, doc: &Document, skip_id: Option<&str>) -> Option<&str> {
        self.unique_fields.iter().map(String::as_str).find(|field| {
            let Some(value) = doc.get(*field) else {
                return false;
            };
            self.docs
                .iter()
                .filter(|other| skip_id.is_none() || document_id(other) != skip_id)
                .any(|other| other.get(*field) == Some(value))
        })
    }

    /// Whether two stored documents already share a value for `field`.
    fn has_duplicates(&self, field: &str) -> bool {
        let mut seen = HashSet::new();
        self.docs
            .iter()
            .filter_map(|doc| doc.get(field))
            .any(|value| !seen.insert(value.to_string()))
    }
}

/// Documents kept in insertion order behind a single lock.
///
/// Each call takes the lock once, so a single operation is atomic; sequences of
/// operations are not.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(AtomicOrdering::Acquire) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        sort: Option<Sort>,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_open()?;
        let collections = self.collections.read();
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|c| c.docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default();

        if let Some(sort) = sort {
            // Stable sort keeps store order between equal keys.
            docs.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_open()?;
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|c| c.docs.iter().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn count(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        self.ensure_open()?;
        let collections = self.collections.read();
        let count = collections
            .get(collection)
            .map(|c| c.docs.iter().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn insert(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        self.ensure_open()?;
        let id = document_id(&doc).ok_or(StoreError::MissingId)?.to_string();
        let mut collections = self.collections.write();
        let entry = collections.entry(collection.to_string()).or_default();

        if entry.position(&id).is_some() {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: crate::ID_FIELD.to_string(),
            });
        }
        if let Some(field) = entry.conflicting_field(&doc, None) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: field.to_string(),
            });
        }

        entry.docs.push(doc);
        Ok(())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        mut doc: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_open()?;
        doc.insert(crate::ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write();
        let Some(entry) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(index) = entry.position(id) else {
            return Ok(None);
        };
        if let Some(field) = entry.conflicting_field(&doc, Some(id)) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: field.to_string(),
            });
        }

        Ok(Some(std::mem::replace(&mut entry.docs[index], doc)))
    }

    async fn remove_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_open()?;
        let mut collections = self.collections.write();
        Ok(collections
            .get_mut(collection)
            .and_then(|entry| entry.position(id).map(|index| entry.docs.remove(index))))
    }

    async fn remove_many(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        self.ensure_open()?;
        let mut collections = self.collections.write();
        let Some(entry) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = entry.docs.len();
        entry.docs.retain(|doc| !filter.matches(doc));
        Ok((before - entry.docs.len()) as u64)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut collections = self.collections.write();
        let entry = collections.entry(collection.to_string()).or_default();
        if entry.unique_fields.iter().any(|f| f == field) {
            return Ok(());
        }
        if entry.has_duplicates(field) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: field.to_string(),
            });
        }
        entry.unique_fields.push(field.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, AtomicOrdering::Release);
        Ok(())
    }
}
