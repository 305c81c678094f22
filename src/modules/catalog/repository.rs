//! Typed access to the catalog collections.

use std::sync::Arc;

use library_db::{Document, DocumentStore, Filter, Sort, StoreError, ID_FIELD};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::error::{CatalogError, CatalogResult};
use super::models::{
    Author, Book, BookInstance, BookStatus, Genre, AUTHORS, BOOKS, BOOK_INSTANCES, GENRES,
};

/// Catalog entities over a shared [`DocumentStore`] handle.
#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn DocumentStore>,
}

fn decode<T: DeserializeOwned>(collection: &'static str, doc: Document) -> CatalogResult<T> {
    serde_json::from_value(Value::Object(doc))
        .map_err(|source| CatalogError::Decode { collection, source })
}

fn encode<T: Serialize>(entity: &T) -> CatalogResult<Document> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(other) => {
            let message = format!("expected an object, found {other}");
            Err(StoreError::Serialization(message).into())
        }
        Err(err) => Err(StoreError::Serialization(err.to_string()).into()),
    }
}

impl CatalogRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn find<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        filter: Filter,
        sort: Option<Sort>,
    ) -> CatalogResult<Vec<T>> {
        self.store
            .find(collection, filter, sort)
            .await?
            .into_iter()
            .map(|doc| decode(collection, doc))
            .collect()
    }

    async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        filter: Filter,
    ) -> CatalogResult<Option<T>> {
        self.store
            .find_one(collection, filter)
            .await?
            .map(|doc| decode(collection, doc))
            .transpose()
    }

    async fn find_by_id<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        id: &str,
    ) -> CatalogResult<Option<T>> {
        self.store
            .find_by_id(collection, id)
            .await?
            .map(|doc| decode(collection, doc))
            .transpose()
    }

    pub async fn count(&self, collection: &'static str, filter: Filter) -> CatalogResult<u64> {
        Ok(self.store.count(collection, filter).await?)
    }

    pub async fn insert<T: Serialize>(
        &self,
        collection: &'static str,
        entity: &T,
    ) -> CatalogResult<()> {
        let doc = encode(entity)?;
        self.store.insert(collection, doc).await?;
        Ok(())
    }

    /// Replace the stored entity with id `id`; `false` when it no longer exists.
    pub async fn update<T: Serialize>(
        &self,
        collection: &'static str,
        id: &str,
        entity: &T,
    ) -> CatalogResult<bool> {
        let doc = encode(entity)?;
        Ok(self.store.update_by_id(collection, id, doc).await?.is_some())
    }

    /// Remove the entity with id `id`; `false` when it did not exist.
    pub async fn remove(&self, collection: &'static str, id: &str) -> CatalogResult<bool> {
        Ok(self.store.remove_by_id(collection, id).await?.is_some())
    }

    // Authors

    pub async fn authors(&self) -> CatalogResult<Vec<Author>> {
        self.find(AUTHORS, Filter::All, None).await
    }

    pub async fn author(&self, id: &str) -> CatalogResult<Option<Author>> {
        self.find_by_id(AUTHORS, id).await
    }

    // Genres

    pub async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        self.find(GENRES, Filter::All, None).await
    }

    pub async fn genres_by_name(&self) -> CatalogResult<Vec<Genre>> {
        self.find(GENRES, Filter::All, Some(Sort::ascending("name")))
            .await
    }

    pub async fn genre(&self, id: &str) -> CatalogResult<Option<Genre>> {
        self.find_by_id(GENRES, id).await
    }

    pub async fn genre_named(&self, name: &str) -> CatalogResult<Option<Genre>> {
        self.find_one(GENRES, Filter::eq("name", name)).await
    }

    pub async fn genres_in(&self, ids: &[String]) -> CatalogResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find(GENRES, Filter::any_of(ID_FIELD, ids.iter().cloned()), None)
            .await
    }

    // Books

    pub async fn books(&self) -> CatalogResult<Vec<Book>> {
        self.find(BOOKS, Filter::All, None).await
    }

    pub async fn book(&self, id: &str) -> CatalogResult<Option<Book>> {
        self.find_by_id(BOOKS, id).await
    }

    pub async fn books_by_author(&self, author_id: &str) -> CatalogResult<Vec<Book>> {
        self.find(BOOKS, Filter::eq("author", author_id), None).await
    }

    pub async fn books_with_genre(&self, genre_id: &str) -> CatalogResult<Vec<Book>> {
        self.find(BOOKS, Filter::eq("genre", genre_id), None).await
    }

    // Book instances

    pub async fn book_instances(&self) -> CatalogResult<Vec<BookInstance>> {
        self.find(BOOK_INSTANCES, Filter::All, None).await
    }

    pub async fn book_instance(&self, id: &str) -> CatalogResult<Option<BookInstance>> {
        self.find_by_id(BOOK_INSTANCES, id).await
    }

    pub async fn instances_of_book(&self, book_id: &str) -> CatalogResult<Vec<BookInstance>> {
        self.find(BOOK_INSTANCES, Filter::eq("book", book_id), None)
            .await
    }

    pub async fn remove_instances_of_book(&self, book_id: &str) -> CatalogResult<u64> {
        Ok(self
            .store
            .remove_many(BOOK_INSTANCES, Filter::eq("book", book_id))
            .await?)
    }

    pub async fn count_available_instances(&self) -> CatalogResult<u64> {
        self.count(
            BOOK_INSTANCES,
            Filter::eq("status", BookStatus::Available.as_str()),
        )
        .await
    }
}
