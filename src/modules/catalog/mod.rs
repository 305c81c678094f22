//! Library catalog: books, authors, genres and book copies.

pub mod error;
pub mod forms;
pub mod models;
pub mod pages;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use library_db::DocumentStore;
use library_http::ViewRenderer;
use library_kernel::{InitCtx, Migration, Module};

use crate::utils;
use models::GENRES;
use routes::CatalogState;
use service::CatalogService;

/// Catalog module: CRUD pages for every catalog entity.
pub struct CatalogModule {
    service: CatalogService,
    renderer: Arc<dyn ViewRenderer>,
}

impl CatalogModule {
    pub fn new(store: Arc<dyn DocumentStore>, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self {
            service: CatalogService::new(store),
            renderer,
        }
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            prefix = %utils::log_prefix(self.name()),
            environment = ?ctx.settings.environment,
            store = ctx.store.backend(),
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(CatalogState {
            service: self.service.clone(),
            renderer: self.renderer.clone(),
        })
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_genre_name_unique",
            collection: GENRES,
            unique_field: "name",
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "catalog module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "catalog module stopped");
        Ok(())
    }
}

/// Create a new instance of the catalog module
pub fn create_module(
    store: Arc<dyn DocumentStore>,
    renderer: Arc<dyn ViewRenderer>,
) -> Arc<dyn Module> {
    Arc::new(CatalogModule::new(store, renderer))
}
