//! Live MongoDB tests. Run with:
//!
//! ```text
//! TYPESTORE_TEST_MONGODB_URI=mongodb://localhost:27017 cargo test -- --ignored
//! ```

#![cfg(feature = "mongodb")]

use typestore::{doc, ConnectOptions, DocumentStore, ListOptions, StoreError, Storer};

use crate::documents::Info;

const ENV_TEST_URI: &str = "TYPESTORE_TEST_MONGODB_URI";

async fn live_store(database: &str) -> DocumentStore<Info> {
    let uri = std::env::var(ENV_TEST_URI).unwrap_or_else(|_| "mongodb://localhost:27017".into());
    DocumentStore::connect(&uri, ConnectOptions::new().database(database))
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn mongo_crud_round_trip() {
    let store = live_store("typestore_test_crud").await;
    let _ = store.delete("m-1").await;

    let info = Info::new("m-1", "Mongo", "open", 1);
    store.create(&info).await.unwrap();
    assert_eq!(store.get("m-1").await.unwrap(), info);

    let replacement = Info::new("m-1", "Mongo v2", "closed", 2);
    store.update("m-1", &replacement).await.unwrap();
    assert_eq!(store.get("m-1").await.unwrap(), replacement);

    assert!(store.delete("m-1").await.unwrap());
    assert!(store.get("m-1").await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn mongo_list_counts_beyond_page() {
    let store = live_store("typestore_test_list").await;
    for i in 0..5 {
        let _ = store.delete(&format!("p-{i}")).await;
        store
            .create(&Info::new(&format!("p-{i}"), "Paged", "paged", i))
            .await
            .unwrap();
    }

    let page = store
        .list(
            ListOptions::new()
                .with_filter(doc! { "status": "paged" })
                .with_limit(2),
        )
        .await
        .unwrap();
    assert_eq!(page.documents.len(), 2);
    assert_eq!(page.total, 5);
}

#[tokio::test]
async fn unreachable_uri_is_returned_not_fatal() {
    let result =
        DocumentStore::<Info>::connect("definitely not a uri", ConnectOptions::new()).await;
    assert!(matches!(result, Err(StoreError::Connection(_))));
}
