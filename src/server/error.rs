//! Error types for the HTTP bootstrap.

use axum::http::Method;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The router cannot filter on this HTTP method.
    #[error("unsupported method {method} for route {path}")]
    UnsupportedMethod { path: String, method: Method },
    /// Route paths and mount prefixes must start with '/'.
    #[error("invalid route path {0:?}: paths must start with '/'")]
    InvalidPath(String),
    /// Two routes share a path shape but name their parameters differently.
    #[error("route {path} conflicts with {existing}: parameter names must match")]
    ConflictingParams { path: String, existing: String },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
