//! DocumentStore - binds a `Document` type to a collection and exposes CRUD.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bson::Document as BsonDocument;
use tracing::{debug, warn};

use super::{
    combine_filters, Backend, ConnectOptions, Document, ListOptions, StoreError,
};

/// One page of `list` results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<D> {
    /// Matching documents, at most the effective limit.
    pub documents: Vec<D>,
    /// Every document matching the filter, regardless of the limit.
    pub total: u64,
}

/// CRUD surface over a single document type.
#[async_trait]
pub trait Storer<D: Document>: Send + Sync {
    /// Insert one document.
    async fn create(&self, document: &D) -> Result<(), StoreError>;

    /// List documents matching the options; limit defaults to 50.
    async fn list(&self, options: ListOptions) -> Result<Page<D>, StoreError>;

    /// Fetch the document whose `id` equals `id`.
    async fn get(&self, id: &str) -> Result<D, StoreError>;

    /// Replace the document whose `id` equals `id`. No merging, no version check.
    /// Replacing an id that does not exist is a no-op, not an error.
    async fn update(&self, id: &str, document: &D) -> Result<(), StoreError>;

    /// Delete the document whose `id` equals `id`. Returns true if one was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// A store bound to one collection holding documents of type `D`.
///
/// Clone-friendly: clones share the backend.
pub struct DocumentStore<D> {
    backend: Arc<dyn Backend>,
    collection: String,
    base_filter: BsonDocument,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Clone for DocumentStore<D> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            collection: self.collection.clone(),
            base_filter: self.base_filter.clone(),
            _marker: PhantomData,
        }
    }
}

impl<D> fmt::Debug for DocumentStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("collection", &self.collection)
            .field("base_filter", &self.base_filter)
            .finish_non_exhaustive()
    }
}

impl<D: Document> DocumentStore<D> {
    /// Connect to MongoDB at `uri` and bind `D` to its collection.
    ///
    /// Connection failures are returned, never fatal.
    #[cfg(feature = "mongodb")]
    pub async fn connect(uri: &str, options: ConnectOptions) -> Result<Self, StoreError> {
        let options = options.resolve()?;
        let backend = super::MongoBackend::connect(uri, &options).await?;
        Ok(Self::bind(Arc::new(backend), options))
    }

    /// Bind `D` to its collection on an existing backend.
    ///
    /// `options.database`, `app_name` and `ping` only matter to `connect`.
    pub fn with_backend(
        backend: Arc<dyn Backend>,
        options: ConnectOptions,
    ) -> Result<Self, StoreError> {
        let options = options.resolve()?;
        Ok(Self::bind(backend, options))
    }

    fn bind(backend: Arc<dyn Backend>, options: ConnectOptions) -> Self {
        let collection = options
            .collection
            .unwrap_or_else(|| D::COLLECTION.to_string());
        debug!(collection = %collection, "document store bound");
        Self {
            backend,
            collection,
            base_filter: options.base_filter,
            _marker: PhantomData,
        }
    }

    /// The collection this store reads and writes.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn id_filter(&self, id: &str) -> BsonDocument {
        let mut by_id = BsonDocument::new();
        by_id.insert(D::ID_FIELD, id);
        combine_filters(&self.base_filter, &by_id)
    }

    fn encode(document: &D) -> Result<BsonDocument, StoreError> {
        Ok(bson::to_document(document)?)
    }

    fn decode(raw: BsonDocument) -> Result<D, StoreError> {
        Ok(bson::from_document(raw)?)
    }
}

#[async_trait]
impl<D: Document> Storer<D> for DocumentStore<D> {
    async fn create(&self, document: &D) -> Result<(), StoreError> {
        let raw = Self::encode(document)?;
        self.backend
            .insert_one(&self.collection, raw)
            .await
            .inspect_err(|e| warn!(collection = %self.collection, id = document.id(), error = %e, "insert failed"))?;
        debug!(collection = %self.collection, id = document.id(), "document created");
        Ok(())
    }

    async fn list(&self, options: ListOptions) -> Result<Page<D>, StoreError> {
        let filter = combine_filters(&self.base_filter, &options.filter);
        let limit = options.effective_limit();
        let mut find = options.find;
        find.limit = Some(limit);

        let raw = self
            .backend
            .find(&self.collection, filter.clone(), find)
            .await?;
        let documents = raw
            .into_iter()
            .map(Self::decode)
            .collect::<Result<Vec<_>, _>>()?;

        // Count of every match, independent of the page
        let total = self.backend.count(&self.collection, filter).await?;

        debug!(
            collection = %self.collection,
            returned = documents.len(),
            total,
            limit,
            "documents listed"
        );
        Ok(Page { documents, total })
    }

    async fn get(&self, id: &str) -> Result<D, StoreError> {
        match self
            .backend
            .find_one(&self.collection, self.id_filter(id))
            .await?
        {
            Some(raw) => Self::decode(raw),
            None => Err(StoreError::not_found(&self.collection, id)),
        }
    }

    async fn update(&self, id: &str, document: &D) -> Result<(), StoreError> {
        let raw = Self::encode(document)?;
        let matched = self
            .backend
            .replace_one(&self.collection, self.id_filter(id), raw)
            .await
            .inspect_err(|e| warn!(collection = %self.collection, id, error = %e, "replace failed"))?;
        if matched == 0 {
            debug!(collection = %self.collection, id, "replace matched no document");
            return Ok(());
        }
        debug!(collection = %self.collection, id, "document replaced");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self
            .backend
            .delete_one(&self.collection, self.id_filter(id))
            .await?;
        debug!(collection = %self.collection, id, deleted, "delete issued");
        Ok(deleted > 0)
    }
}
