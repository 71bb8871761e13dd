//! End-to-end tests: viewer → edge → origin over real sockets.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use edge_allowlist::origin::{ClientIpResponse, IP_NOT_FOUND};
use edge_allowlist::store::InMemoryStore;
use edge_allowlist::Shutdown;

mod common;

fn addr(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn allowlist(value: &str) -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::from_entries([("allowIps", value)]))
}

#[tokio::test]
async fn test_allowed_viewer_sees_own_ip() {
    let origin_addr = addr(28181);
    let edge_addr = addr(28182);
    let shutdown = Shutdown::new();

    common::start_origin(origin_addr, &shutdown).await;
    common::start_edge(edge_addr, origin_addr, allowlist("152.165.121.190,127.0.0.1"), &shutdown).await;

    let res = common::client()
        .get(format!("http://{}/api/getClientIp", edge_addr))
        .header("x-client-ip", "9.9.9.9")
        .header("origin", "https://viewer.example.com")
        .send()
        .await
        .expect("Edge unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "*");

    let body: ClientIpResponse = res.json().await.unwrap();
    assert_eq!(body.ip, "127.0.0.1", "Spoofed header must be replaced by the connection IP");

    shutdown.trigger();
}

#[tokio::test]
async fn test_denied_viewer_never_reaches_origin() {
    let origin_addr = addr(28281);
    let edge_addr = addr(28282);
    let shutdown = Shutdown::new();

    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    common::start_programmable_backend(origin_addr, move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (200, "reached".into())
        }
    })
    .await;
    common::start_edge(edge_addr, origin_addr, allowlist("152.165.121.190"), &shutdown).await;

    let client = common::client();
    for _ in 0..3 {
        let res = client
            .get(format!("http://{}/api/getClientIp", edge_addr))
            .header("x-client-ip", "152.165.121.190")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.status().canonical_reason(), Some("Forbidden"));
        assert!(res.text().await.unwrap().is_empty());
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0, "Denied requests must not be forwarded");

    shutdown.trigger();
}

#[tokio::test]
async fn test_empty_allowlist_denies_everyone() {
    let origin_addr = addr(28381);
    let edge_addr = addr(28382);
    let shutdown = Shutdown::new();

    common::start_origin(origin_addr, &shutdown).await;
    common::start_edge(edge_addr, origin_addr, Arc::new(InMemoryStore::new()), &shutdown).await;

    let res = common::client()
        .get(format!("http://{}/api/getClientIp", edge_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    shutdown.trigger();
}

#[tokio::test]
async fn test_allowlist_change_applies_to_next_request() {
    let origin_addr = addr(28481);
    let edge_addr = addr(28482);
    let shutdown = Shutdown::new();

    let store = Arc::new(InMemoryStore::new());
    common::start_origin(origin_addr, &shutdown).await;
    common::start_edge(edge_addr, origin_addr, store.clone(), &shutdown).await;

    let client = common::client();
    let url = format!("http://{}/api/getClientIp", edge_addr);

    assert_eq!(client.get(&url).send().await.unwrap().status(), StatusCode::FORBIDDEN);

    store.put("allowIps", "127.0.0.1");
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<ClientIpResponse>().await.unwrap().ip, "127.0.0.1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_origin_without_forwarded_header() {
    let origin_addr = addr(28581);
    let shutdown = Shutdown::new();
    common::start_origin(origin_addr, &shutdown).await;

    let res = common::client()
        .get(format!("http://{}/api/getClientIp", origin_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "ip": IP_NOT_FOUND }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_origin_is_bad_gateway() {
    // Nothing listens on the origin port.
    let origin_addr = addr(28681);
    let edge_addr = addr(28682);
    let shutdown = Shutdown::new();

    common::start_edge(edge_addr, origin_addr, allowlist("127.0.0.1"), &shutdown).await;

    let res = common::client()
        .get(format!("http://{}/api/getClientIp", edge_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}
