use std::collections::HashMap;

use super::CatalogService;
use crate::modules::catalog::error::{CatalogError, CatalogResult};
use crate::modules::catalog::forms::{BookInstanceForm, FieldError, RawFields};
use crate::modules::catalog::models::{
    Book, BookInstance, BookInstanceView, BookStatus, BOOK_INSTANCES,
};
use crate::modules::catalog::pages::{
    BookInstanceDeletePage, BookInstanceDetailPage, BookInstanceFormPage, BookInstanceListPage,
    BookOption, Outcome,
};
use crate::utils::new_id;

const NOT_FOUND: &str = "Book copy not found";
const CREATE_TITLE: &str = "Create BookInstance";
const UPDATE_TITLE: &str = "Update Copy";

impl CatalogService {
    pub async fn book_instance_list(&self) -> CatalogResult<BookInstanceListPage> {
        let (instances, books) =
            tokio::try_join!(self.repo.book_instances(), self.repo.books())?;
        let books: HashMap<&str, &Book> = books.iter().map(|b| (b.id.as_str(), b)).collect();

        let bookinstance_list = instances
            .iter()
            .map(|copy| BookInstanceView::new(copy, books.get(copy.book.as_str()).copied()))
            .collect();
        Ok(BookInstanceListPage {
            title: "Book Instance List".to_string(),
            bookinstance_list,
        })
    }

    /// Copy with its owning book resolved.
    async fn book_instance_view(&self, id: &str) -> CatalogResult<BookInstanceView> {
        let copy = self
            .repo
            .book_instance(id)
            .await?
            .ok_or(CatalogError::NotFound(NOT_FOUND))?;
        let book = self.repo.book(&copy.book).await?;
        Ok(BookInstanceView::new(&copy, book.as_ref()))
    }

    pub async fn book_instance_detail(&self, id: &str) -> CatalogResult<BookInstanceDetailPage> {
        let bookinstance = self.book_instance_view(id).await?;
        Ok(BookInstanceDetailPage {
            title: format!("Copy: {}", bookinstance.book_title),
            bookinstance,
        })
    }

    async fn book_instance_form_page(
        &self,
        title: &str,
        bookinstance: BookInstanceForm,
        errors: Vec<FieldError>,
    ) -> CatalogResult<BookInstanceFormPage> {
        let books = self.repo.books().await?;
        Ok(BookInstanceFormPage {
            title: title.to_string(),
            book_list: books
                .into_iter()
                .map(|book| BookOption {
                    id: book.id,
                    title: book.title,
                })
                .collect(),
            selected_book: bookinstance.book.clone(),
            statuses: BookStatus::ALL.to_vec(),
            bookinstance,
            errors,
        })
    }

    /// Validate a submitted copy, including that its book exists.
    async fn checked_book_instance(
        &self,
        form: &BookInstanceForm,
        id: String,
    ) -> CatalogResult<Result<BookInstance, Vec<FieldError>>> {
        let copy = match form.validated(id) {
            Ok(copy) => copy,
            Err(errors) => return Ok(Err(errors)),
        };
        if self.repo.book(&copy.book).await?.is_none() {
            return Ok(Err(vec![FieldError {
                field: "book",
                message: "Book must exist.".to_string(),
            }]));
        }
        Ok(Ok(copy))
    }

    pub async fn book_instance_create_form(&self) -> CatalogResult<BookInstanceFormPage> {
        self.book_instance_form_page(CREATE_TITLE, BookInstanceForm::default(), Vec::new())
            .await
    }

    pub async fn book_instance_create(
        &self,
        raw: &RawFields,
    ) -> CatalogResult<Outcome<BookInstanceFormPage>> {
        let form = BookInstanceForm::parse(raw);
        let copy = match self.checked_book_instance(&form, new_id()).await? {
            Ok(copy) => copy,
            Err(errors) => {
                let page = self.book_instance_form_page(CREATE_TITLE, form, errors).await?;
                return Ok(Outcome::Render(page));
            }
        };

        self.repo.insert(BOOK_INSTANCES, &copy).await?;
        tracing::info!(
            target: "project::catalog",
            book_instance_id = %copy.id,
            "book copy created"
        );
        Ok(Outcome::Redirect(copy.url()))
    }

    pub async fn book_instance_update_form(
        &self,
        id: &str,
    ) -> CatalogResult<BookInstanceFormPage> {
        let copy = self
            .repo
            .book_instance(id)
            .await?
            .ok_or(CatalogError::NotFound(NOT_FOUND))?;
        let form = BookInstanceForm::from_instance(&copy);
        self.book_instance_form_page(UPDATE_TITLE, form, Vec::new())
            .await
    }

    pub async fn book_instance_update(
        &self,
        id: &str,
        raw: &RawFields,
    ) -> CatalogResult<Outcome<BookInstanceFormPage>> {
        let form = BookInstanceForm::parse(raw);
        let copy = match self.checked_book_instance(&form, id.to_string()).await? {
            Ok(copy) => copy,
            Err(errors) => {
                let page = self.book_instance_form_page(UPDATE_TITLE, form, errors).await?;
                return Ok(Outcome::Render(page));
            }
        };

        if !self.repo.update(BOOK_INSTANCES, id, &copy).await? {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }
        tracing::info!(
            target: "project::catalog",
            book_instance_id = %copy.id,
            "book copy updated"
        );
        Ok(Outcome::Redirect(copy.url()))
    }

    pub async fn book_instance_delete_form(
        &self,
        id: &str,
    ) -> CatalogResult<BookInstanceDeletePage> {
        let bookinstance = self.book_instance_view(id).await?;
        Ok(BookInstanceDeletePage {
            title: format!(
                "Delete bookinstance: {}, {}",
                bookinstance.book_title, bookinstance.imprint
            ),
            bookinstance,
        })
    }

    /// Delete a copy and return to its book.
    pub async fn book_instance_delete(
        &self,
        id: &str,
    ) -> CatalogResult<Outcome<BookInstanceDeletePage>> {
        let copy = self
            .repo
            .book_instance(id)
            .await?
            .ok_or(CatalogError::NotFound(NOT_FOUND))?;

        if !self.repo.remove(BOOK_INSTANCES, id).await? {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }
        tracing::info!(target: "project::catalog", book_instance_id = %id, "book copy deleted");
        Ok(Outcome::Redirect(format!("/catalog/book/{}", copy.book)))
    }
}
