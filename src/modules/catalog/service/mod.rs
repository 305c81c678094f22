//! Catalog operations: list, detail, create, update and delete for each entity.
//!
//! Detail and delete-confirmation pages read their collections concurrently
//! and fail as a whole if any read fails. Writes are single store calls with
//! no transaction around them.

mod author;
mod book;
mod book_instance;
mod genre;
mod home;

use std::sync::Arc;

use library_db::DocumentStore;

use super::error::CatalogError;
use super::repository::CatalogRepository;

pub const BOOK_LIST_URL: &str = "/catalog/books";
pub const AUTHOR_LIST_URL: &str = "/catalog/authors";
pub const GENRE_LIST_URL: &str = "/catalog/genres";

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: CatalogRepository::new(store),
        }
    }

    pub fn repository(&self) -> &CatalogRepository {
        &self.repo
    }
}

fn is_duplicate_key(err: &CatalogError) -> bool {
    matches!(err, CatalogError::Store(store) if store.is_duplicate_key())
}
