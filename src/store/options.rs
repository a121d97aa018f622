//! ConnectOptions - explicit configuration for binding a store to a collection.

use std::fmt;

use bson::Document;

use super::StoreError;

/// Logical database used when none is configured.
pub const DEFAULT_DATABASE: &str = "info";

type ConfigureFn = Box<dyn FnOnce(&mut ConnectOptions) -> Result<(), StoreError> + Send>;

/// Options applied when a `DocumentStore` is constructed.
///
/// Fields have fixed defaults (database `"info"`, collection taken from
/// `Document::COLLECTION`, empty base filter, ping enabled). Functions
/// registered with [`ConnectOptions::configure`] run afterwards, in
/// registration order; the first error aborts construction.
pub struct ConnectOptions {
    pub database: String,
    pub app_name: Option<String>,
    /// Overrides the document type's collection name.
    pub collection: Option<String>,
    /// Filter AND-combined with every query the store issues.
    pub base_filter: Document,
    /// Run a `ping` command after connecting.
    pub ping: bool,
    configure: Vec<ConfigureFn>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            collection: None,
            base_filter: Document::new(),
            ping: true,
            configure: Vec::new(),
        }
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("database", &self.database)
            .field("app_name", &self.app_name)
            .field("collection", &self.collection)
            .field("base_filter", &self.base_filter)
            .field("ping", &self.ping)
            .field("configure", &self.configure.len())
            .finish()
    }
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the store at a different logical database.
    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.database = name.into();
        self
    }

    /// Application name reported to the server.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    pub fn base_filter(mut self, filter: Document) -> Self {
        self.base_filter = filter;
        self
    }

    pub fn ping(mut self, ping: bool) -> Self {
        self.ping = ping;
        self
    }

    /// Register a configuration function that may adjust the options or fail.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut ConnectOptions) -> Result<(), StoreError> + Send + 'static,
    {
        self.configure.push(Box::new(f));
        self
    }

    /// Run the registered configuration functions and validate the result.
    pub(crate) fn resolve(mut self) -> Result<Self, StoreError> {
        let pending = std::mem::take(&mut self.configure);
        for f in pending {
            f(&mut self)?;
        }

        if self.database.is_empty() {
            return Err(StoreError::Config("database name must not be empty".into()));
        }
        if matches!(self.collection.as_deref(), Some("")) {
            return Err(StoreError::Config("collection name must not be empty".into()));
        }
        Ok(self)
    }
}
