//! Edge backed by an import document on disk.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use edge_allowlist::store::{FileStore, ImportDocument};
use edge_allowlist::Shutdown;

mod common;

#[tokio::test]
async fn test_reloaded_file_changes_decision() {
    let origin_addr: SocketAddr = "127.0.0.1:28781".parse().unwrap();
    let edge_addr: SocketAddr = "127.0.0.1:28782".parse().unwrap();
    let path = std::env::temp_dir().join(format!("edge-allowlist-reload-{}.json", uuid::Uuid::new_v4()));

    let deny_all = ImportDocument::allowlist(&["152.165.121.190"]);
    std::fs::write(&path, deny_all.to_json().unwrap()).unwrap();
    let store = Arc::new(FileStore::open(&path).unwrap());

    let shutdown = Shutdown::new();
    common::start_origin(origin_addr, &shutdown).await;
    common::start_edge(edge_addr, origin_addr, store.clone(), &shutdown).await;

    let client = common::client();
    let url = format!("http://{}/api/getClientIp", edge_addr);
    assert_eq!(client.get(&url).send().await.unwrap().status(), StatusCode::FORBIDDEN);

    let allow_local = ImportDocument::allowlist(&["152.165.121.190", "127.0.0.1"]);
    std::fs::write(&path, allow_local.to_json().unwrap()).unwrap();
    store.reload().unwrap();

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["ip"], "127.0.0.1");

    shutdown.trigger();
    std::fs::remove_file(&path).unwrap_or_default();
}
