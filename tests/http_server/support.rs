//! Shared server fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};

use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use typestore::server::{Route, Server, ServerError};

/// Counts calls that reached `guarded`; only the preflight test routes to it.
pub static GUARDED_HITS: AtomicUsize = AtomicUsize::new(0);

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
}

async fn create_item(Json(input): Json<CreateItem>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "created": input.name })))
}

pub async fn guarded() -> StatusCode {
    GUARDED_HITS.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

pub async fn explode() -> &'static str {
    panic!("handler exploded")
}

pub fn item_routes() -> Vec<Route> {
    vec![Route::post("/items", create_item)]
}

pub struct RunningServer {
    pub base: String,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl RunningServer {
    pub async fn stop(self) -> Result<(), ServerError> {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap()
    }
}

/// Bind to port 0 and serve until `stop` is called.
pub async fn start(server: Server) -> RunningServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve_with_shutdown(listener, async {
                let _ = rx.await;
            })
            .await
    });
    RunningServer {
        base: format!("http://{addr}"),
        shutdown,
        handle,
    }
}
