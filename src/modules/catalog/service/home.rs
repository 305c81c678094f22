use library_db::Filter;

use super::CatalogService;
use crate::modules::catalog::error::CatalogResult;
use crate::modules::catalog::models::{AUTHORS, BOOKS, BOOK_INSTANCES, GENRES};
use crate::modules::catalog::pages::HomePage;

impl CatalogService {
    /// Record counts for the catalog home page.
    pub async fn home(&self) -> CatalogResult<HomePage> {
        let (books, copies, available, authors, genres) = tokio::try_join!(
            self.repo.count(BOOKS, Filter::All),
            self.repo.count(BOOK_INSTANCES, Filter::All),
            self.repo.count_available_instances(),
            self.repo.count(AUTHORS, Filter::All),
            self.repo.count(GENRES, Filter::All),
        )?;

        Ok(HomePage {
            title: "Local Library Home".to_string(),
            book_count: books,
            book_instance_count: copies,
            book_instance_available_count: available,
            author_count: authors,
            genre_count: genres,
        })
    }
}
