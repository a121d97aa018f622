// Lets `#[derive(Document)]` expand to `typestore::Document` inside this crate too.
extern crate self as typestore;

mod config;
mod store;

#[cfg(feature = "http")]
pub mod server;

pub use config::{
    ServerConfig, StoreConfig, ENV_ADDR, ENV_APP_NAME, ENV_DATABASE, ENV_MONGODB_URI,
};
pub use store::{
    combine_filters, Backend, ConnectOptions, Document, DocumentStore, FindOptions,
    InMemoryBackend, ListOptions, Page, StoreError, Storer, DEFAULT_DATABASE, DEFAULT_LIMIT,
};

#[cfg(feature = "mongodb")]
pub use store::MongoBackend;

// Derive macro for `Document`
pub use typestore_macros::Document;

// Re-export bson so filters can be built without a separate dependency
pub use bson;
pub use bson::doc;
