//! Environment-driven configuration for the store and the server.

use serde::Deserialize;

use crate::store::{ConnectOptions, DEFAULT_DATABASE};

pub const ENV_MONGODB_URI: &str = "TYPESTORE_MONGODB_URI";
pub const ENV_DATABASE: &str = "TYPESTORE_DATABASE";
pub const ENV_APP_NAME: &str = "TYPESTORE_APP_NAME";
pub const ENV_ADDR: &str = "TYPESTORE_ADDR";

const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_ADDR: &str = "0.0.0.0:8080";

fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_addr() -> String {
    DEFAULT_ADDR.to_string()
}

/// Where the document store connects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub app_name: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            app_name: None,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `TYPESTORE_MONGODB_URI`, `TYPESTORE_DATABASE`
    /// and `TYPESTORE_APP_NAME`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            uri: lookup(ENV_MONGODB_URI).unwrap_or(defaults.uri),
            database: lookup(ENV_DATABASE).unwrap_or(defaults.database),
            app_name: lookup(ENV_APP_NAME).or(defaults.app_name),
        }
    }

    /// Connect options carrying this database and app name.
    pub fn connect_options(&self) -> ConnectOptions {
        let options = ConnectOptions::new().database(self.database.clone());
        match &self.app_name {
            Some(name) => options.app_name(name.clone()),
            None => options,
        }
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `TYPESTORE_ADDR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            addr: lookup(ENV_ADDR).unwrap_or_else(default_addr),
        }
    }
}
