//! Document Store - typed CRUD over one collection.
//!
//! A `DocumentStore<D>` binds one document type to one collection for its
//! lifetime. Every call is an independent round trip to the backend; nothing
//! is cached, batched or retried.
//!
//! ## Example
//!
//! ```ignore
//! use typestore::{doc, ConnectOptions, Document, DocumentStore, ListOptions, Storer};
//!
//! #[derive(Clone, Serialize, Deserialize, Document)]
//! struct Info {
//!     id: String,
//!     title: String,
//! }
//!
//! // Bound to the "info" collection in the "info" database
//! let store = DocumentStore::<Info>::connect("mongodb://localhost:27017", ConnectOptions::new()).await?;
//! store.create(&info).await?;
//! let page = store.list(ListOptions::new().with_filter(doc! { "title": "x" })).await?;
//! ```

mod backend;
mod document_store;
mod error;
mod in_memory;
#[cfg(feature = "mongodb")]
mod mongo;
mod options;
mod query;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be stored in a document collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// The collection this type is stored in.
    /// `#[derive(Document)]` defaults it to the lower-cased type name.
    const COLLECTION: &'static str;

    /// Name of the stored field id lookups filter on.
    const ID_FIELD: &'static str = "id";

    /// Returns the value of the document's `id` field.
    fn id(&self) -> &str;
}

pub use backend::Backend;
pub use document_store::{DocumentStore, Page, Storer};
pub use error::StoreError;
pub use in_memory::InMemoryBackend;
#[cfg(feature = "mongodb")]
pub use mongo::MongoBackend;
pub use options::{ConnectOptions, DEFAULT_DATABASE};
pub use query::{combine_filters, FindOptions, ListOptions, DEFAULT_LIMIT};
