//! MongoBackend - forwards every call to the MongoDB driver.

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions as DriverFindOptions};
use mongodb::{Client, Collection, Database};
use tracing::{debug, error};

use super::{Backend, ConnectOptions, FindOptions, StoreError};

/// MongoDB-backed storage bound to one logical database.
#[derive(Clone, Debug)]
pub struct MongoBackend {
    database: Database,
}

impl MongoBackend {
    /// Open a client for `uri` and select `options.database`.
    ///
    /// With `options.ping` set, a `ping` command verifies the server is
    /// reachable before returning.
    pub async fn connect(uri: &str, options: &ConnectOptions) -> Result<Self, StoreError> {
        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            error!(error = %e, "invalid MongoDB connection string");
            StoreError::Connection(e.to_string())
        })?;
        if let Some(app_name) = &options.app_name {
            client_options.app_name = Some(app_name.clone());
        }

        let client = Client::with_options(client_options)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let database = client.database(&options.database);

        if options.ping {
            database
                .run_command(doc! { "ping": 1 }, None)
                .await
                .map_err(|e| {
                    error!(error = %e, database = %options.database, "MongoDB ping failed");
                    StoreError::Connection(e.to_string())
                })?;
        }

        debug!(database = %options.database, "connected to MongoDB");
        Ok(Self { database })
    }

    /// Wrap an existing database handle.
    pub fn from_database(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }
}

fn driver_find_options(options: FindOptions) -> DriverFindOptions {
    let mut find = DriverFindOptions::default();
    find.limit = options.limit;
    find.skip = options.skip;
    find.sort = options.sort;
    find.projection = options.projection;
    find
}

#[async_trait]
impl Backend for MongoBackend {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.collection(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| StoreError::write(collection, e))?;
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .collection(collection)
            .find(filter, driver_find_options(options))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        Ok(self
            .collection(collection)
            .count_documents(filter, None)
            .await?)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collection(collection).find_one(filter, None).await?)
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        replacement: Document,
    ) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .replace_one(filter, replacement, None)
            .await
            .map_err(|e| StoreError::write(collection, e))?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let result = self.collection(collection).delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }
}
