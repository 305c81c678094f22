use thiserror::Error;

/// Failures surfaced by a [`crate::DocumentStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key in '{collection}': {key}")]
    DuplicateKey { collection: String, key: String },

    #[error("document is missing an '_id' string")]
    MissingId,

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("store connection is closed")]
    Unavailable,
}

impl StoreError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}
