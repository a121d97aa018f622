//! Items API: a DocumentStore served through the HTTP bootstrap.
//!
//! ```text
//! TYPESTORE_MONGODB_URI=mongodb://localhost:27017 cargo run --example items
//! curl -X POST localhost:8080/items/create -H 'content-type: application/json' \
//!      -d '{"id":"1","name":"widget","price":3}'
//! ```
//!
//! Without `TYPESTORE_MONGODB_URI` the demo keeps documents in memory.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use typestore::server::{Route, Server};
use typestore::{
    ConnectOptions, Document, DocumentStore, InMemoryBackend, ListOptions,
    ServerConfig, StoreConfig, StoreError, Storer,
};

#[derive(Clone, Debug, Serialize, Deserialize, Document)]
struct Item {
    id: String,
    name: String,
    price: i64,
}

#[derive(Deserialize)]
struct ById {
    id: String,
}

#[derive(Deserialize)]
struct ListRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    limit: Option<i64>,
}

type Items = Arc<dyn Storer<Item>>;

fn error_response(err: StoreError) -> Response {
    let status = match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Serde(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn routes(items: Items) -> Vec<Route> {
    let create = {
        let items = items.clone();
        move |Json(item): Json<Item>| async move {
            match items.create(&item).await {
                Ok(()) => (StatusCode::CREATED, Json(json!({ "id": item.id }))).into_response(),
                Err(e) => error_response(e),
            }
        }
    };
    let get = {
        let items = items.clone();
        move |Json(req): Json<ById>| async move {
            match items.get(&req.id).await {
                Ok(item) => Json(item).into_response(),
                Err(e) => error_response(e),
            }
        }
    };
    let list = {
        let items = items.clone();
        move |Json(req): Json<ListRequest>| async move {
            let mut options = ListOptions::new();
            if let Some(name) = req.name {
                options = options.with_filter(typestore::doc! { "name": name });
            }
            if let Some(limit) = req.limit {
                options = options.with_limit(limit);
            }
            match items.list(options).await {
                Ok(page) => {
                    Json(json!({ "items": page.documents, "total": page.total })).into_response()
                }
                Err(e) => error_response(e),
            }
        }
    };
    let update = {
        let items = items.clone();
        move |Json(item): Json<Item>| async move {
            match items.update(&item.id, &item).await {
                Ok(()) => StatusCode::NO_CONTENT.into_response(),
                Err(e) => error_response(e),
            }
        }
    };
    let delete = move |Json(req): Json<ById>| async move {
        match items.delete(&req.id).await {
            Ok(deleted) => Json(json!({ "deleted": deleted })).into_response(),
            Err(e) => error_response(e),
        }
    };

    vec![
        Route::post("/items/create", create),
        Route::post("/items/get", get),
        Route::post("/items/list", list),
        Route::post("/items/update", update),
        Route::post("/items/delete", delete),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store_config = StoreConfig::from_env();
    let server_config = ServerConfig::from_env();

    let items: Items = if std::env::var(typestore::ENV_MONGODB_URI).is_ok() {
        Arc::new(
            DocumentStore::<Item>::connect(&store_config.uri, store_config.connect_options())
                .await?,
        )
    } else {
        tracing::warn!("no MongoDB URI configured, keeping items in memory");
        Arc::new(DocumentStore::<Item>::with_backend(
            Arc::new(InMemoryBackend::new()),
            ConnectOptions::new(),
        )?)
    };

    tracing::info!(collection = Item::COLLECTION, addr = %server_config.addr, "starting items API");
    Server::new()
        .routes(routes(items))
        .serve(&server_config.addr)
        .await?;
    Ok(())
}
