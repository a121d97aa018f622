//! HTTP bootstrap - wraps caller routes in CORS, request logging and panic
//! recovery, then serves them.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Middleware (outermost first)
//!
//! 1. CORS: fixed policy, `OPTIONS` answered with a bare 200.
//! 2. Request logging via `tower_http::trace::TraceLayer`.
//! 3. Panic recovery via `tower_http::catch_panic::CatchPanicLayer`; a
//!    panicking handler yields a 500 for that request only.
//!
//! ## Example
//!
//! ```ignore
//! use typestore::server::{Route, Server};
//!
//! Server::new()
//!     .route(Route::post("/items", create_item))
//!     .route(Route::get("/items/:id", get_item))
//!     .serve("0.0.0.0:8080")
//!     .await?;
//! ```

mod cors;
mod error;
mod route;

use std::collections::{HashMap, HashSet};
use std::future::Future;

use axum::http::Method;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub use cors::{ALLOWED_HEADERS, ALLOWED_METHODS, MAX_AGE_SECS};
pub use error::ServerError;
pub use route::Route;

/// Collects routes and mounted routers, then serves them behind the middleware stack.
#[derive(Debug, Default)]
pub struct Server {
    routes: Vec<Route>,
    mounts: Vec<(String, Router)>,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Registration order is preserved.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Serve a whole router under a path prefix (e.g. a generated RPC service).
    pub fn mount(mut self, prefix: impl Into<String>, router: Router) -> Self {
        self.mounts.push((prefix.into(), router));
        self
    }

    /// Build the axum `Router` with every route and the middleware stack applied.
    ///
    /// Routes are compared by path shape, so `/items/:id` and `/items/:key` are
    /// the same path. A second route with the same shape and method is skipped;
    /// the first one wins. Sharing a shape under different parameter names
    /// across methods is a `ConflictingParams` error.
    pub fn into_router(self) -> Result<Router, ServerError> {
        let mut router = Router::new();
        let mut seen: HashSet<(String, Method)> = HashSet::new();
        // shape -> first concrete path registered for it
        let mut paths: HashMap<String, String> = HashMap::new();

        for route in self.routes {
            let (path, method, method_router) = route.into_parts()?;
            let shape = path_shape(&path);
            if !seen.insert((shape.clone(), method.clone())) {
                warn!(%path, %method, "duplicate route ignored");
                continue;
            }
            match paths.get(&shape) {
                Some(existing) if *existing != path => {
                    return Err(ServerError::ConflictingParams {
                        path,
                        existing: existing.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    paths.insert(shape, path.clone());
                }
            }
            router = router.route(&path, method_router);
        }

        for (prefix, nested) in self.mounts {
            if !prefix.starts_with('/') {
                return Err(ServerError::InvalidPath(prefix));
            }
            router = if prefix == "/" {
                router.merge(nested)
            } else {
                router.nest(&prefix, nested)
            };
        }

        Ok(router.layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(cors::cors))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new()),
        ))
    }

    /// Bind `addr` and serve until Ctrl-C.
    pub async fn serve(self, addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(|source| {
            error!(%addr, error = %source, "error starting server");
            ServerError::Bind {
                addr: addr.to_string(),
                source,
            }
        })?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `signal` resolves.
    ///
    /// A clean stop returns `Ok(())`; any other failure is logged and returned.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.into_router()?;
        match listener.local_addr() {
            Ok(local) => info!(addr = %local, "server listening"),
            Err(e) => warn!(error = %e, "server listening on unknown address"),
        }

        match axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
        {
            Ok(()) => {
                info!("server closed");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "server error");
                Err(ServerError::Serve(e))
            }
        }
    }
}

/// Build a router from routes with the standard middleware stack.
pub fn router(routes: impl IntoIterator<Item = Route>) -> Result<Router, ServerError> {
    Server::new().routes(routes).into_router()
}

/// Serve routes at `addr` until Ctrl-C.
pub async fn serve(
    addr: &str,
    routes: impl IntoIterator<Item = Route>,
) -> Result<(), ServerError> {
    Server::new().routes(routes).serve(addr).await
}

/// Path with every `:param` and `*wildcard` segment replaced by a placeholder.
fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with(':') || segment.starts_with('*') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler unavailable, serving until the process exits");
        std::future::pending::<()>().await;
    }
}
