//! MongoDB-backed document store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde_json::Value;

use crate::{Document, DocumentStore, Filter, Sort, StoreError, ID_FIELD};

const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect and verify the server answers a ping.
    pub async fn connect(endpoint: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(endpoint).await.map_err(backend)?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend)?;
        Ok(Self { client, database })
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.database.collection(name)
    }
}

fn backend(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn write_error(collection: &str, err: mongodb::error::Error) -> StoreError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE => {
            Some(write.message.clone())
        }
        ErrorKind::Command(command) if command.code == DUPLICATE_KEY_CODE => {
            Some(command.message.clone())
        }
        _ => None,
    };

    match duplicate {
        Some(key) => StoreError::DuplicateKey {
            collection: collection.to_string(),
            key,
        },
        None => backend(err),
    }
}

fn to_bson(value: &Value) -> Result<Bson, StoreError> {
    bson::to_bson(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn to_bson_document(doc: &Document) -> Result<bson::Document, StoreError> {
    bson::to_document(doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn from_bson_document(doc: bson::Document) -> Result<Document, StoreError> {
    match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a document, found {other}"
        ))),
    }
}

fn to_query(filter: &Filter) -> Result<bson::Document, StoreError> {
    Ok(match filter {
        Filter::All => bson::Document::new(),
        // Equality on an array field matches any element, same as `Filter::matches`.
        Filter::Eq(field, value) => doc! { field.as_str(): to_bson(value)? },
        Filter::In(field, values) => {
            let values = values.iter().map(to_bson).collect::<Result<Vec<_>, _>>()?;
            doc! { field.as_str(): { "$in": values } }
        }
    })
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
        sort: Option<Sort>,
    ) -> Result<Vec<Document>, StoreError> {
        let query = to_query(&filter)?;
        let coll = self.collection(collection);
        let mut action = coll.find(query);
        if let Some(sort) = sort {
            let direction = if sort.ascending { 1 } else { -1 };
            action = action.sort(doc! { sort.field.as_str(): direction });
        }

        let cursor = action.await.map_err(backend)?;
        let docs: Vec<bson::Document> = cursor.try_collect().await.map_err(backend)?;
        docs.into_iter().map(from_bson_document).collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError> {
        let query = to_query(&filter)?;
        self.collection(collection)
            .find_one(query)
            .await
            .map_err(backend)?
            .map(from_bson_document)
            .transpose()
    }

    async fn count(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        let query = to_query(&filter)?;
        self.collection(collection)
            .count_documents(query)
            .await
            .map_err(backend)
    }

    async fn insert(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        if crate::document_id(&doc).is_none() {
            return Err(StoreError::MissingId);
        }
        let doc = to_bson_document(&doc)?;
        self.collection(collection)
            .insert_one(doc)
            .await
            .map_err(|err| write_error(collection, err))?;
        Ok(())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        mut doc: Document,
    ) -> Result<Option<Document>, StoreError> {
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        let replacement = to_bson_document(&doc)?;
        self.collection(collection)
            .find_one_and_replace(doc! { ID_FIELD: id }, replacement)
            .await
            .map_err(|err| write_error(collection, err))?
            .map(from_bson_document)
            .transpose()
    }

    async fn remove_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one_and_delete(doc! { ID_FIELD: id })
            .await
            .map_err(backend)?
            .map(from_bson_document)
            .transpose()
    }

    async fn remove_many(&self, collection: &str, filter: Filter) -> Result<u64, StoreError> {
        let query = to_query(&filter)?;
        let result = self
            .collection(collection)
            .delete_many(query)
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection(collection)
            .create_index(index)
            .await
            .map_err(|err| write_error(collection, err))?;
        tracing::info!(target: "library-db", collection, field, "unique index ensured");
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.client.clone().shutdown().await;
        tracing::info!(target: "library-db", "MongoDB client shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_filter_translates_to_equality_query() {
        let query = to_query(&Filter::eq("genre", "g1")).unwrap();
        assert_eq!(query, doc! { "genre": "g1" });
    }

    #[test]
    fn in_filter_translates_to_in_operator() {
        let query = to_query(&Filter::any_of(ID_FIELD, ["a", "b"])).unwrap();
        assert_eq!(query, doc! { "_id": { "$in": ["a", "b"] } });
    }

    /// Runs only when `LIBRARY_TEST_MONGODB_URI` points at a live server.
    #[tokio::test]
    async fn sorted_find_and_unique_index_against_live_server() {
        let Ok(endpoint) = std::env::var("LIBRARY_TEST_MONGODB_URI") else {
            return;
        };
        let database = format!("library_test_{}", std::process::id());
        let store = MongoStore::connect(&endpoint, &database).await.unwrap();

        for (id, name) in [("g1", "Poetry"), ("g2", "Fantasy"), ("g3", "Fantasy")] {
            let Value::Object(doc) = json!({"_id": id, "name": name}) else {
                panic!("expected an object");
            };
            store.insert("genres", doc).await.unwrap();
        }

        let sorted = store
            .find("genres", Filter::All, Some(Sort::ascending("name")))
            .await
            .unwrap();
        let names: Vec<_> = sorted.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["Fantasy", "Fantasy", "Poetry"]);

        let err = store.ensure_unique_index("genres", "name").await.unwrap_err();
        assert!(err.is_duplicate_key());

        store.database.drop().await.unwrap();
        store.close().await.unwrap();
    }

    #[test]
    fn documents_round_trip_through_bson() {
        let value = json!({"_id": "c1", "imprint": "Penguin", "due_back": "2026-10-15"});
        let Value::Object(original) = value else {
            panic!("expected an object");
        };
        let converted = from_bson_document(to_bson_document(&original).unwrap()).unwrap();
        assert_eq!(converted, original);
    }
}
