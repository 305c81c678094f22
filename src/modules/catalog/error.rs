use library_db::StoreError;
use library_http::AppError;
use thiserror::Error;

/// Failures of catalog operations that abandon the request.
///
/// Validation failures and blocked deletes are not errors: they re-render the
/// originating page.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored document in '{collection}' is malformed: {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(message) => AppError::not_found(message),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}
