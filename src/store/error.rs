//! Error types for document store operations.

use thiserror::Error;

/// Error type for document store operations.
///
/// Driver failures are forwarded as values; nothing in the store terminates
/// the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the URI was rejected.
    #[error("failed to connect to document store: {0}")]
    Connection(String),
    /// A configuration function rejected the connect options.
    #[error("invalid store configuration: {0}")]
    Config(String),
    /// Insert or replace failed.
    #[error("write to {collection} failed: {message}")]
    Write { collection: String, message: String },
    /// No document with the given id exists in the collection.
    #[error("document not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    /// BSON encoding/decoding error.
    #[error("document serialization error: {0}")]
    Serde(String),
    /// Any other driver or storage-level failure.
    #[error("document store error: {0}")]
    Driver(String),
}

impl StoreError {
    /// True for the "no such document" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub(crate) fn write(collection: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Write {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Driver(err.to_string())
    }
}
