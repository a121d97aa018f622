//! Backend - raw BSON operations against a named collection.

use async_trait::async_trait;
use bson::Document;

use super::{FindOptions, StoreError};

/// Storage seam beneath `DocumentStore`.
///
/// Each method is a single round trip to the backing store. Implementations
/// forward failures as `StoreError` values and never retry.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Insert one document.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Return the documents matching `filter`, honouring sort, skip and limit.
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Count every document matching `filter`, ignoring pagination.
    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Return the first document matching `filter`.
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Replace the first document matching `filter`. Returns the matched count.
    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        replacement: Document,
    ) -> Result<u64, StoreError>;

    /// Delete the first document matching `filter`. Returns the deleted count.
    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;
}
