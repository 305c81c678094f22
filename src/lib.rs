//! Local library catalog application.
//!
//! Books, authors, genres and book copies served as HTML pages over a
//! document store.

pub mod bootstrap;
pub mod modules;
pub mod utils;
pub mod views;

/// Re-export commonly used types
pub use modules::catalog::{service::CatalogService, CatalogModule};
pub use views::HtmlViews;
