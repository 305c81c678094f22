use super::{CatalogService, AUTHOR_LIST_URL};
use crate::modules::catalog::error::{CatalogError, CatalogResult};
use crate::modules::catalog::forms::{AuthorForm, FieldError, RawFields};
use crate::modules::catalog::models::{Author, AuthorView, BookView, AUTHORS};
use crate::modules::catalog::pages::{
    AuthorDeletePage, AuthorDetailPage, AuthorFormPage, AuthorListPage, Outcome,
};
use crate::utils::new_id;

const NOT_FOUND: &str = "Author not found";
const CREATE_TITLE: &str = "Create Author";
const UPDATE_TITLE: &str = "Update Author";

fn form_page(title: &str, author: AuthorForm, errors: Vec<FieldError>) -> AuthorFormPage {
    AuthorFormPage {
        title: title.to_string(),
        author,
        errors,
    }
}

impl CatalogService {
    pub async fn author_list(&self) -> CatalogResult<AuthorListPage> {
        let authors = self.repo.authors().await?;
        Ok(AuthorListPage {
            title: "Author List".to_string(),
            author_list: authors.iter().map(AuthorView::from).collect(),
        })
    }

    pub async fn author_detail(&self, id: &str) -> CatalogResult<AuthorDetailPage> {
        let (author, books) =
            tokio::try_join!(self.repo.author(id), self.repo.books_by_author(id))?;
        let author = author.ok_or(CatalogError::NotFound(NOT_FOUND))?;

        Ok(AuthorDetailPage {
            title: "Author Detail".to_string(),
            author: AuthorView::from(&author),
            author_books: books.iter().map(BookView::from).collect(),
        })
    }

    pub fn author_create_form(&self) -> AuthorFormPage {
        form_page(CREATE_TITLE, AuthorForm::default(), Vec::new())
    }

    pub async fn author_create(&self, raw: &RawFields) -> CatalogResult<Outcome<AuthorFormPage>> {
        let form = AuthorForm::parse(raw);
        let author = match form.validated(new_id()) {
            Ok(author) => author,
            Err(errors) => return Ok(Outcome::Render(form_page(CREATE_TITLE, form, errors))),
        };

        self.repo.insert(AUTHORS, &author).await?;
        tracing::info!(target: "project::catalog", author_id = %author.id, "author created");
        Ok(Outcome::Redirect(author.url()))
    }

    pub async fn author_update_form(&self, id: &str) -> CatalogResult<AuthorFormPage> {
        let author = self.repo.author(id).await?.ok_or(CatalogError::NotFound(NOT_FOUND))?;
        Ok(form_page(UPDATE_TITLE, AuthorForm::from_author(&author), Vec::new()))
    }

    pub async fn author_update(
        &self,
        id: &str,
        raw: &RawFields,
    ) -> CatalogResult<Outcome<AuthorFormPage>> {
        let form = AuthorForm::parse(raw);
        let author: Author = match form.validated(id.to_string()) {
            Ok(author) => author,
            Err(errors) => return Ok(Outcome::Render(form_page(UPDATE_TITLE, form, errors))),
        };

        if !self.repo.update(AUTHORS, id, &author).await? {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }
        tracing::info!(target: "project::catalog", author_id = %author.id, "author updated");
        Ok(Outcome::Redirect(author.url()))
    }

    pub async fn author_delete_form(&self, id: &str) -> CatalogResult<AuthorDeletePage> {
        let (author, books) =
            tokio::try_join!(self.repo.author(id), self.repo.books_by_author(id))?;
        let author = author.ok_or(CatalogError::NotFound(NOT_FOUND))?;

        Ok(AuthorDeletePage {
            title: "Delete Author".to_string(),
            author: AuthorView::from(&author),
            author_books: books.iter().map(BookView::from).collect(),
        })
    }

    /// Delete an author with no books; otherwise show the books to remove first.
    pub async fn author_delete(&self, id: &str) -> CatalogResult<Outcome<AuthorDeletePage>> {
        let page = self.author_delete_form(id).await?;
        if !page.author_books.is_empty() {
            tracing::info!(
                target: "project::catalog",
                author_id = %id,
                blocking_books = page.author_books.len(),
                "author delete refused"
            );
            return Ok(Outcome::Render(page));
        }

        if !self.repo.remove(AUTHORS, id).await? {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }
        tracing::info!(target: "project::catalog", author_id = %id, "author deleted");
        Ok(Outcome::Redirect(AUTHOR_LIST_URL.to_string()))
    }
}
