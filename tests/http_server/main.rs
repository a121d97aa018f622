//! HTTP bootstrap integration tests.
//!
//! Starts a real server on an ephemeral port and exercises it with reqwest.

#![cfg(feature = "http")]

mod support;

use std::sync::atomic::Ordering;

use axum::extract::Path;
use axum::http::StatusCode;
use reqwest::Method;
use typestore::server::{Route, Server, ServerError, ALLOWED_HEADERS};

use support::{explode, guarded, item_routes, start, GUARDED_HITS};

#[tokio::test]
async fn preflight_is_answered_without_reaching_handler() {
    let server = start(Server::new().route(Route::post("/guarded", guarded))).await;
    let client = reqwest::Client::new();

    let resp = client
        .request(Method::OPTIONS, format!("{}/guarded", server.base))
        .header("Origin", "https://app.example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers().clone();
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://app.example.com"
    );
    assert_eq!(headers["access-control-allow-methods"], "POST");
    assert_eq!(headers["access-control-allow-headers"], ALLOWED_HEADERS);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-max-age"], "300");
    assert!(resp.bytes().await.unwrap().is_empty());

    assert_eq!(GUARDED_HITS.load(Ordering::SeqCst), 0);

    // a real POST does reach the handler
    let resp = client
        .post(format!("{}/guarded", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(GUARDED_HITS.load(Ordering::SeqCst), 1);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn preflight_to_unregistered_path_still_succeeds() {
    let server = start(Server::new().routes(item_routes())).await;
    let resp = reqwest::Client::new()
        .request(Method::OPTIONS, format!("{}/nowhere", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn post_route_serves_post_with_cors_headers() {
    let server = start(Server::new().routes(item_routes())).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/items", server.base))
        .header("Origin", "https://app.example.com")
        .json(&serde_json::json!({ "name": "widget" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "created": "widget" }));
    server.stop().await.unwrap();
}

#[tokio::test]
async fn method_must_match_exactly() {
    let server = start(Server::new().routes(item_routes())).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/items", server.base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    // CORS headers are present on error responses too
    assert_eq!(resp.headers()["access-control-max-age"], "300");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let server = start(Server::new().routes(item_routes())).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/missing", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn panicking_handler_fails_only_its_request() {
    let server = start(
        Server::new()
            .routes(item_routes())
            .route(Route::post("/explode", explode)),
    )
    .await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/explode", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = client
        .post(format!("{}/items", server.base))
        .json(&serde_json::json!({ "name": "after" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn duplicate_route_keeps_first_registration() {
    let server = start(
        Server::new()
            .route(Route::post("/which", || async { "first" }))
            .route(Route::post("/which", || async { "second" })),
    )
    .await;

    let text = reqwest::Client::new()
        .post(format!("{}/which", server.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "first");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn renamed_parameter_duplicate_keeps_first_registration() {
    let server = start(
        Server::new()
            .route(Route::post(
                "/items/:id",
                |Path(id): Path<String>| async move { format!("first {id}") },
            ))
            .route(Route::post(
                "/items/:key",
                |Path(key): Path<String>| async move { format!("second {key}") },
            )),
    )
    .await;

    let text = reqwest::Client::new()
        .post(format!("{}/items/42", server.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "first 42");
    server.stop().await.unwrap();
}

#[test]
fn parameter_names_must_agree_across_methods() {
    let err = Server::new()
        .route(Route::get("/items/:id", || async { "get" }))
        .route(Route::post("/items/:key", || async { "post" }))
        .into_router()
        .unwrap_err();

    assert!(matches!(
        err,
        ServerError::ConflictingParams { ref path, ref existing }
            if path == "/items/:key" && existing == "/items/:id"
    ));
}

#[tokio::test]
async fn same_parameter_names_across_methods_coexist() {
    let server = start(
        Server::new()
            .route(Route::get("/items/:id", |Path(id): Path<String>| async move {
                format!("got {id}")
            }))
            .route(Route::delete("/items/:id", |Path(id): Path<String>| async move {
                format!("deleted {id}")
            })),
    )
    .await;
    let client = reqwest::Client::new();

    let got = client
        .get(format!("{}/items/7", server.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let deleted = client
        .delete(format!("{}/items/7", server.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(got, "got 7");
    assert_eq!(deleted, "deleted 7");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn same_path_different_methods_coexist() {
    let server = start(
        Server::new()
            .route(Route::post("/thing", || async { "posted" }))
            .route(Route::delete("/thing", || async { "deleted" })),
    )
    .await;
    let client = reqwest::Client::new();

    let posted = client
        .post(format!("{}/thing", server.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let deleted = client
        .delete(format!("{}/thing", server.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(posted, "posted");
    assert_eq!(deleted, "deleted");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn mounted_router_serves_under_prefix() {
    let rpc = axum::Router::new().route("/Ping", axum::routing::post(|| async { "pong" }));
    let server = start(Server::new().mount("/rpc", rpc)).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/rpc/Ping", server.base))
        .header("Origin", "https://app.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );
    assert_eq!(resp.text().await.unwrap(), "pong");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn invalid_route_is_reported_before_serving() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let err = Server::new()
        .route(Route::post("no-slash", || async { "x" }))
        .serve_with_shutdown(listener, std::future::pending())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        typestore::server::ServerError::InvalidPath(p) if p == "no-slash"
    ));
}

#[tokio::test]
async fn bind_failure_is_returned() {
    let err = typestore::server::serve("not-an-address", item_routes())
        .await
        .unwrap_err();
    assert!(matches!(err, typestore::server::ServerError::Bind { .. }));
}

#[tokio::test]
async fn graceful_shutdown_is_a_clean_stop() {
    let server = start(Server::new().routes(item_routes())).await;
    assert!(server.stop().await.is_ok());
}
