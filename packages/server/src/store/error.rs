use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("document store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}
