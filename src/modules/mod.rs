pub mod catalog;
pub mod store;

use std::sync::Arc;

use library_db::DocumentStore;
use library_http::ViewRenderer;
use library_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: Arc<dyn DocumentStore>,
    renderer: Arc<dyn ViewRenderer>,
) {
    registry.register_core(Arc::new(store::StoreModule::new(store.clone())));
    registry.register_custom(catalog::create_module(store, renderer));
}
