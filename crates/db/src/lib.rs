//! Document store seam for the library catalog.
//!
//! Documents are JSON objects grouped in named collections and keyed by a
//! string `_id`. Two backends implement [`DocumentStore`]: an in-process
//! [`MemoryStore`] and a MongoDB-backed [`MongoStore`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

pub mod error;
pub mod memory;
pub mod mongo;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Field holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// A stored document.
pub type Document = Map<String, Value>;

/// Query predicate over the documents of one collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document.
    All,
    /// `field` equals `value`, or `field` is an array containing `value`.
    Eq(String, Value),
    /// `field` equals any of the listed values.
    In(String, Vec<Value>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn id(id: &str) -> Self {
        Self::eq(ID_FIELD, id)
    }

    pub fn any_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// Evaluate the predicate against a document held in memory.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, expected) => match doc.get(field) {
                Some(Value::Array(items)) => items.contains(expected),
                Some(actual) => actual == expected,
                None => expected.is_null(),
            },
            Filter::In(field, candidates) => doc
                .get(field)
                .is_some_and(|actual| candidates.contains(actual)),
        }
    }
}

/// Sort order for [`DocumentStore::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub ascending: bool,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }
}

/// Query and mutation surface the catalog depends on.
///
/// Unsorted `find` results come back in store order (insertion order for the
/// in-memory backend, natural order for MongoDB).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label used in logs.
    fn backend(&self) -> &'static str;

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        sort: Option<Sort>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.find_one(collection, Filter::id(id)).await
    }

    async fn count(&self, collection: &str, filter: Filter) -> Result<u64, StoreError>;

    /// Insert a new document. The document must carry an `_id`.
    async fn insert(&self, collection: &str, doc: Document) -> Result<(), StoreError>;

    /// Replace the document with the given id, returning the previous version,
    /// or `None` when no such document exists.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        doc: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Remove the document with the given id, returning it if it existed.
    async fn remove_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Remove every matching document, returning how many were removed.
    async fn remove_many(&self, collection: &str, filter: Filter) -> Result<u64, StoreError>;

    /// Declare `field` unique within `collection`. Idempotent. Fails with
    /// [`StoreError::DuplicateKey`] when stored documents already conflict.
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;

    /// Release the underlying connection. The store is unusable afterwards.
    async fn close(&self) -> Result<(), StoreError>;
}

/// Which backend [`connect`] should build.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Mongo,
}

/// Build the process-wide store handle.
pub async fn connect(
    backend: Backend,
    endpoint: &str,
    database: &str,
) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match backend {
        Backend::Memory => Arc::new(MemoryStore::new()),
        Backend::Mongo => Arc::new(
            MongoStore::connect(endpoint, database)
                .await
                .with_context(|| format!("failed to connect to MongoDB at {endpoint}"))?,
        ),
    };

    tracing::info!(
        target: "library-db",
        backend = store.backend(),
        database,
        "document store connected"
    );

    Ok(store)
}

/// Read the `_id` of a document.
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}
