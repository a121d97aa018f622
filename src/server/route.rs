//! Route - a (path, method, handler) triple.

use std::fmt;

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{on, MethodFilter, MethodRouter};

use super::ServerError;

type BuildFn = Box<dyn FnOnce(MethodFilter) -> MethodRouter + Send>;

/// One route registered by exact path and HTTP method.
pub struct Route {
    path: String,
    method: Method,
    build: BuildFn,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl Route {
    /// Any axum handler works, e.g. `async fn create(Json(body): Json<Item>) -> StatusCode`.
    pub fn new<H, T>(path: impl Into<String>, method: Method, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            path: path.into(),
            method,
            build: Box::new(move |filter| on(filter, handler)),
        }
    }

    pub fn get<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::new(path, Method::GET, handler)
    }

    pub fn post<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::new(path, Method::POST, handler)
    }

    pub fn put<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::new(path, Method::PUT, handler)
    }

    pub fn patch<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::new(path, Method::PATCH, handler)
    }

    pub fn delete<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::new(path, Method::DELETE, handler)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolve into the path and a method router filtered on exactly this method.
    pub(crate) fn into_parts(self) -> Result<(String, Method, MethodRouter), ServerError> {
        if !self.path.starts_with('/') {
            return Err(ServerError::InvalidPath(self.path));
        }
        let filter = match MethodFilter::try_from(self.method.clone()) {
            Ok(filter) => filter,
            Err(_) => {
                return Err(ServerError::UnsupportedMethod {
                    path: self.path,
                    method: self.method,
                })
            }
        };
        let router = (self.build)(filter);
        Ok((self.path, self.method, router))
    }
}
