use super::{is_duplicate_key, CatalogService, GENRE_LIST_URL};
use crate::modules::catalog::error::{CatalogError, CatalogResult};
use crate::modules::catalog::forms::{FieldError, GenreForm, RawFields};
use crate::modules::catalog::models::{BookView, Genre, GenreView, GENRES};
use crate::modules::catalog::pages::{
    GenreDeletePage, GenreDetailPage, GenreFormPage, GenreListPage, Outcome,
};
use crate::utils::new_id;

const NOT_FOUND: &str = "Genre not found";
const CREATE_TITLE: &str = "Create Genre";
const UPDATE_TITLE: &str = "Update Genre";

fn form_page(title: &str, genre: GenreForm, errors: Vec<FieldError>) -> GenreFormPage {
    GenreFormPage {
        title: title.to_string(),
        genre,
        errors,
    }
}

fn name_taken() -> Vec<FieldError> {
    vec![FieldError {
        field: "name",
        message: "Genre name already exists".to_string(),
    }]
}

impl CatalogService {
    pub async fn genre_list(&self) -> CatalogResult<GenreListPage> {
        let genres = self.repo.genres_by_name().await?;
        Ok(GenreListPage {
            title: "Genre List".to_string(),
            genre_list: genres.iter().map(GenreView::from).collect(),
        })
    }

    pub async fn genre_detail(&self, id: &str) -> CatalogResult<GenreDetailPage> {
        let (genre, books) = tokio::try_join!(self.repo.genre(id), self.repo.books_with_genre(id))?;
        let genre = genre.ok_or(CatalogError::NotFound(NOT_FOUND))?;

        Ok(GenreDetailPage {
            title: "Genre Detail".to_string(),
            genre: GenreView::from(&genre),
            genre_books: books.iter().map(BookView::from).collect(),
        })
    }

    pub fn genre_create_form(&self) -> GenreFormPage {
        form_page(CREATE_TITLE, GenreForm::default(), Vec::new())
    }

    /// Create a genre, or redirect to the existing one with the same name.
    pub async fn genre_create(&self, raw: &RawFields) -> CatalogResult<Outcome<GenreFormPage>> {
        let form = GenreForm::parse(raw);
        let genre = match form.validated(new_id()) {
            Ok(genre) => genre,
            Err(errors) => return Ok(Outcome::Render(form_page(CREATE_TITLE, form, errors))),
        };

        if let Some(existing) = self.repo.genre_named(&genre.name).await? {
            return Ok(Outcome::Redirect(existing.url()));
        }

        match self.repo.insert(GENRES, &genre).await {
            Ok(()) => {}
            // Lost a race with a concurrent create of the same name.
            Err(err) if is_duplicate_key(&err) => {
                return match self.repo.genre_named(&genre.name).await? {
                    Some(existing) => Ok(Outcome::Redirect(existing.url())),
                    None => Err(err),
                };
            }
            Err(err) => return Err(err),
        }

        tracing::info!(target: "project::catalog", genre_id = %genre.id, "genre created");
        Ok(Outcome::Redirect(genre.url()))
    }

    pub async fn genre_update_form(&self, id: &str) -> CatalogResult<GenreFormPage> {
        let genre = self.repo.genre(id).await?.ok_or(CatalogError::NotFound(NOT_FOUND))?;
        Ok(form_page(UPDATE_TITLE, GenreForm::from_genre(&genre), Vec::new()))
    }

    pub async fn genre_update(
        &self,
        id: &str,
        raw: &RawFields,
    ) -> CatalogResult<Outcome<GenreFormPage>> {
        let form = GenreForm::parse(raw);
        let genre: Genre = match form.validated(id.to_string()) {
            Ok(genre) => genre,
            Err(errors) => return Ok(Outcome::Render(form_page(UPDATE_TITLE, form, errors))),
        };

        if let Some(existing) = self.repo.genre_named(&genre.name).await? {
            if existing.id != genre.id {
                return Ok(Outcome::Render(form_page(UPDATE_TITLE, form, name_taken())));
            }
        }

        match self.repo.update(GENRES, id, &genre).await {
            Ok(true) => {}
            Ok(false) => return Err(CatalogError::NotFound(NOT_FOUND)),
            Err(err) if is_duplicate_key(&err) => {
                return Ok(Outcome::Render(form_page(UPDATE_TITLE, form, name_taken())));
            }
            Err(err) => return Err(err),
        }

        tracing::info!(target: "project::catalog", genre_id = %genre.id, "genre updated");
        Ok(Outcome::Redirect(genre.url()))
    }

    pub async fn genre_delete_form(&self, id: &str) -> CatalogResult<GenreDeletePage> {
        let (genre, books) = tokio::try_join!(self.repo.genre(id), self.repo.books_with_genre(id))?;
        let genre = genre.ok_or(CatalogError::NotFound(NOT_FOUND))?;

        Ok(GenreDeletePage {
            title: "Delete Genre".to_string(),
            genre: GenreView::from(&genre),
            genre_books: books.iter().map(BookView::from).collect(),
        })
    }

    /// Delete a genre no book refers to; otherwise show the blocking books.
    pub async fn genre_delete(&self, id: &str) -> CatalogResult<Outcome<GenreDeletePage>> {
        let page = self.genre_delete_form(id).await?;
        if !page.genre_books.is_empty() {
            tracing::info!(
                target: "project::catalog",
                genre_id = %id,
                blocking_books = page.genre_books.len(),
                "genre delete refused"
            );
            return Ok(Outcome::Render(page));
        }

        if !self.repo.remove(GENRES, id).await? {
            return Err(CatalogError::NotFound(NOT_FOUND));
        }

        tracing::info!(target: "project::catalog", genre_id = %id, "genre deleted");
        Ok(Outcome::Redirect(GENRE_LIST_URL.to_string()))
    }
}
