//! HTTP server facade for the library catalog: routing, middleware, error pages.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    response::Redirect,
    routing::get,
    Router,
};

use library_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod render;
pub mod router;

pub use error::AppError;
pub use render::{render_page, ViewRenderer};
use router::RouterBuilder;

/// Module whose index `/` redirects to.
const HOME_MODULE: &str = "catalog";

/// Start the HTTP server and serve until a shutdown signal arrives
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    renderer: Arc<dyn ViewRenderer>,
) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings, renderer);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &Settings,
    renderer: Arc<dyn ViewRenderer>,
) -> Router {
    let mut router_builder = RouterBuilder::new()
        .route("/", get(|| async { Redirect::to(&format!("/{HOME_MODULE}")) }))
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(
            module = module_name,
            "mounting module routes under /{}",
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module.routes());
    }

    // Routes and fallback first: layers only wrap what is already registered.
    // The timeout sits inside the error pages so timed-out requests get the error view.
    router_builder
        .with_fallback()
        .with_timeout(settings.server.request_timeout_ms)
        .with_error_pages(renderer, settings.environment.exposes_error_details())
        .with_security_headers()
        .with_compression()
        .with_tracing()
        .with_request_id()
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
