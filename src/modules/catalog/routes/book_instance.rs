//! Handlers for book copies; a deleted copy redirects to its book.

use axum::{
    extract::{Path, State},
    response::Response,
};
use library_http::AppError;

use super::CatalogState;
use crate::modules::catalog::forms::RawFields;

pub(super) async fn list(State(state): State<CatalogState>) -> Result<Response, AppError> {
    state.page(&state.service.book_instance_list().await?)
}

pub(super) async fn detail(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.page(&state.service.book_instance_detail(&id).await?)
}

pub(super) async fn create_form(State(state): State<CatalogState>) -> Result<Response, AppError> {
    state.page(&state.service.book_instance_create_form().await?)
}

pub(super) async fn create(
    State(state): State<CatalogState>,
    raw: RawFields,
) -> Result<Response, AppError> {
    state.outcome(state.service.book_instance_create(&raw).await?)
}

pub(super) async fn update_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.page(&state.service.book_instance_update_form(&id).await?)
}

pub(super) async fn update(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    raw: RawFields,
) -> Result<Response, AppError> {
    state.outcome(state.service.book_instance_update(&id, &raw).await?)
}

pub(super) async fn delete_form(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.page(&state.service.book_instance_delete_form(&id).await?)
}

pub(super) async fn delete(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    state.outcome(state.service.book_instance_delete(&id).await?)
}
