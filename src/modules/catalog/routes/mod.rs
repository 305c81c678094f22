//! HTTP handlers for the catalog, mounted under `/catalog`.

mod author;
mod book;
mod book_instance;
mod genre;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use library_http::{render_page, AppError, ViewRenderer};

use super::forms::RawFields;
use super::pages::{Outcome, Template};
use super::service::CatalogService;

/// Shared by every catalog handler.
#[derive(Clone)]
pub struct CatalogState {
    pub service: CatalogService,
    pub renderer: Arc<dyn ViewRenderer>,
}

impl CatalogState {
    fn page<T: Template>(&self, page: &T) -> Result<Response, AppError> {
        render_page(self.renderer.as_ref(), T::VIEW, page)
    }

    fn outcome<T: Template>(&self, outcome: Outcome<T>) -> Result<Response, AppError> {
        match outcome {
            Outcome::Render(page) => self.page(&page),
            Outcome::Redirect(target) => Ok(Redirect::to(&target).into_response()),
        }
    }
}

impl<S: Send + Sync> FromRequest<S> for RawFields {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(RawFields::from_urlencoded(&body))
    }
}

pub fn router(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(index))
        // Books
        .route("/books", get(book::list))
        .route("/book/create", get(book::create_form).post(book::create))
        .route("/book/{id}", get(book::detail))
        .route("/book/{id}/update", get(book::update_form).post(book::update))
        .route("/book/{id}/delete", get(book::delete_form).post(book::delete))
        // Authors
        .route("/authors", get(author::list))
        .route("/author/create", get(author::create_form).post(author::create))
        .route("/author/{id}", get(author::detail))
        .route("/author/{id}/update", get(author::update_form).post(author::update))
        .route("/author/{id}/delete", get(author::delete_form).post(author::delete))
        // Genres
        .route("/genres", get(genre::list))
        .route("/genre/create", get(genre::create_form).post(genre::create))
        .route("/genre/{id}", get(genre::detail))
        .route("/genre/{id}/update", get(genre::update_form).post(genre::update))
        .route("/genre/{id}/delete", get(genre::delete_form).post(genre::delete))
        // Book copies
        .route("/bookinstances", get(book_instance::list))
        .route(
            "/bookinstance/create",
            get(book_instance::create_form).post(book_instance::create),
        )
        .route("/bookinstance/{id}", get(book_instance::detail))
        .route(
            "/bookinstance/{id}/update",
            get(book_instance::update_form).post(book_instance::update),
        )
        .route(
            "/bookinstance/{id}/delete",
            get(book_instance::delete_form).post(book_instance::delete),
        )
        .with_state(state)
}

/// Catalog home: record counts.
async fn index(State(state): State<CatalogState>) -> Result<Response, AppError> {
    state.page(&state.service.home().await?)
}
