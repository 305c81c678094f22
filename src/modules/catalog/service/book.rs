use std::collections::HashMap;

use super::{CatalogService, BOOK_LIST_URL};
use crate::modules::catalog::error::{CatalogError, CatalogResult};
use crate::modules::catalog::forms::{BookForm, FieldError, RawFields};
use crate::modules::catalog::models::{
    Author, AuthorView, Book, BookDetailView, BookInstanceView, BookView, BOOKS,
};
use crate::modules::catalog::pages::{
    BookDeletePage, BookDetailPage, BookFormPage, BookListPage, GenreOption, Outcome,
};
use crate::utils::new_id;

const NOT_FOUND: &str = "Book not found";
const AUTHOR_NOT_FOUND: &str = "Author not found";
const CREATE_TITLE: &str = "Create Book";
const UPDATE_TITLE: &str = "Update Book";

impl CatalogService {
    /// Books in store order, each with its author resolved.
    pub async fn book_list(&self) -> CatalogResult<BookListPage> {
        let (books, authors) = tokio::try_join!(self.repo.books(), self.repo.authors())?;
        let authors: HashMap<&str, &Author> =
            authors.iter().map(|a| (a.id.as_str(), a)).collect();

        let book_list = books
            .iter()
            .map(|book| BookView::new(book, authors.get(book.author.as_str()).copied()))
            .collect();
        Ok(BookListPage {
            title: "Book List".to_string(),
            book_list,
        })
    }

    /// Book with its copies, then its author and genres. A book whose author
    /// is gone is reported as not found.
    pub async fn book_detail(&self, id: &str) -> CatalogResult<BookDetailPage> {
        let (book, book_instances) = self.book_with_instances(id).await?;
        Ok(BookDetailPage {
            title: book.title.clone(),
            book,
            book_instances,
        })
    }

    async fn book_with_instances(
        &self,
        id: &str,
    ) -> CatalogResult<(BookDetailView, Vec<BookInstanceView>)> {
        let (book, instances) =
            tokio::try_join!(self.repo.book(id), self.repo.instances_of_book(id))?;
        let book = book.ok_or(CatalogError::NotFound(NOT_FOUND))?;

        let (author, genres) = tokio::try_join!(
            self.repo.author(&book.author),
            self.repo.genres_in(&book.genre)
        )?;
        let author = author.ok_or(CatalogError::NotFound(AUTHOR_NOT_FOUND))?;

        let instances = instances
            .iter()
            .map(|copy| BookInstanceView::new(copy, Some(&book)))
            .collect();
        Ok((BookDetailView::new(&book, &author, &genres), instances))
    }

    /// Form page with every author and every genre, genres in the draft checked.
    async fn book_form_page(
        &self,
        title: &str,
        book: BookForm,
        errors: Vec<FieldError>,
    ) -> CatalogResult<BookFormPage> {
        let (authors, genres) = tokio::try_join!(self.repo.authors(), self.repo.genres())?;
        let genres = genres
            .into_iter()
            .map(|genre| GenreOption {
                checked: book.genre.contains(&genre.id),
                id: genre.id,
                name: genre.name,
            })
            .collect();

        Ok(BookFormPage {
            title: title.to_string(),
            authors: authors.iter().map(AuthorView::from).collect(),
            genres,
            book,
            errors,
        })
    }

    /// Validate a submitted book, including that its author exists.
    async fn checked_book(
        &self,
        form: &BookForm,
        id: String,
    ) -> CatalogResult<Result<Book, Vec<FieldError>>> {
        let book = match form.validated(id) {
            Ok(book) => book,
            Err(errors) => return Ok(Err(errors)),
        };
        if self.repo.author(&book.author).await?.is_none() {
            return Ok(Err(vec![FieldError {
                field: "author",
                message: "Author must exist.".to_string(),
            }]));
        }
        Ok(Ok(book))
    }

    pub async fn book_create_form(&self) -> CatalogResult<BookFormPage> {
        self.book_form_page(CREATE_TITLE, BookForm::default(), Vec::new())
            .await
    }

    pub async fn book_create(&self, raw: &RawFields) -> CatalogResult<Outcome<BookFormPage>> {
        let form = BookForm::parse(raw);
        let book = match self.checked_book(&form, new_id()).await? {
            Ok(book) => book,
            Err(errors) => {
                let page = self.book_form_page(CREATE_TITLE, form, errors).await?;
                return Ok(Outcome::Render(page));
            }
        };

        self.repo.insert(BOOKS, &book).await?;
        tracing::info!(target: "project::catalog", book_id = %book.id, "book created");
        Ok(Outcome::Redirect(book.url()))
    }

    pub async fn book_update_form(&self, id: &str) -> CatalogResult<BookFormPage> {
        let book = self.repo.book(id).await?.ok_or(CatalogError::NotFound(NOT_FOUND))?;
        self.book_form_page(UPDATE_TITLE, BookForm::from_book(&book), Vec::new())
            .await
    }

    pub async fn book_update(
        &self,
        id: &str,
        raw: &RawFields,
    ) -> CatalogResult<Outcome<BookFormPage>> {
        let form = BookForm::parse(raw);
        let book = match self.checked_book(&form, id.to_string()).await? {
            Ok(book) => book,
            Err(errors) => {
                let page = self.book_form_page(UPDATE_TITLE, form, errors).await?;
                return Ok(Outcome::Render(page));
            }
        };

        if !self.repo.update(BOOKS, id, &book).await? {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }
        tracing::info!(target: "project::catalog", book_id = %book.id, "book updated");
        Ok(Outcome::Redirect(book.url()))
    }

    pub async fn book_delete_form(&self, id: &str) -> CatalogResult<BookDeletePage> {
        let (book, book_instances) = self.book_with_instances(id).await?;
        Ok(BookDeletePage {
            title: "Delete Book".to_string(),
            book,
            book_instances,
        })
    }

    /// Delete a book together with its copies.
    pub async fn book_delete(&self, id: &str) -> CatalogResult<Outcome<BookDeletePage>> {
        if self.repo.book(id).await?.is_none() {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }

        let copies = self.repo.remove_instances_of_book(id).await?;
        if !self.repo.remove(BOOKS, id).await? {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }
        tracing::info!(target: "project::catalog", book_id = %id, copies, "book deleted");
        Ok(Outcome::Redirect(BOOK_LIST_URL.to_string()))
    }
}
