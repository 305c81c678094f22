//! Process wiring: store, modules, HTTP server and shutdown.

use std::sync::Arc;

use anyhow::Context;
use library_db::DocumentStore;
use library_http::ViewRenderer;
use library_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;
use crate::views::HtmlViews;

/// Registry holding the store module and the catalog module.
pub fn registry(
    store: Arc<dyn DocumentStore>,
    renderer: Arc<dyn ViewRenderer>,
) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, renderer);
    registry
}

async fn connect(settings: &Settings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    library_db::connect(
        settings.database.backend,
        &settings.database.endpoint,
        &settings.database.name,
    )
    .await
}

/// Serve the catalog until SIGINT or SIGTERM, then stop every module.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    library_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        database = %settings.database.name,
        "library-app bootstrap starting"
    );

    let store = connect(&settings).await?;
    let renderer: Arc<dyn ViewRenderer> = Arc::new(HtmlViews::new());
    let registry = registry(store.clone(), renderer.clone());

    let ctx = InitCtx {
        settings: &settings,
        store: store.as_ref(),
    };
    registry.init_core_modules(&ctx).await?;
    registry.init_custom_modules(&ctx).await?;
    registry.apply_migrations(store.as_ref()).await?;
    registry.start_core_modules(&ctx).await?;
    registry.start_custom_modules(&ctx).await?;

    tracing::info!("library-app bootstrap complete");

    let served = library_http::start_server(&registry, &settings, renderer).await;

    // The store module is core and stops last, closing the store.
    registry.stop_custom_modules().await?;
    registry.stop_core_modules().await?;

    served
}

/// Create the unique indexes every module declares, then close the store.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let store = connect(settings).await?;
    let registry = registry(store.clone(), Arc::new(HtmlViews::new()));

    let applied = registry
        .apply_migrations(store.as_ref())
        .await
        .context("migrations failed")?;
    store.close().await?;
    Ok(applied)
}
