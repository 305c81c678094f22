use std::sync::Arc;

use async_trait::async_trait;
use library_db::DocumentStore;
use library_kernel::{InitCtx, Module};

/// Core module owning the document store lifecycle.
pub struct StoreModule {
    store: Arc<dyn DocumentStore>,
}

impl StoreModule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for StoreModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            backend = self.store.backend(),
            database = %ctx.settings.database.name,
            "document store ready"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store.close().await?;
        tracing::info!(module = self.name(), "document store closed");
        Ok(())
    }
}
