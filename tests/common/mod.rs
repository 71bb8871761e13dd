//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use edge_allowlist::config::AppConfig;
use edge_allowlist::store::KeyValueStore;
use edge_allowlist::{EdgeServer, OriginServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start the origin echo server on `addr`.
#[allow(dead_code)]
pub async fn start_origin(addr: SocketAddr, shutdown: &Shutdown) {
    let mut config = AppConfig::default();
    config.origin.bind_address = addr.to_string();

    let server = OriginServer::new(&config);
    let listener = TcpListener::bind(addr).await.unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
}

/// Start an edge server on `addr` forwarding to `origin`.
#[allow(dead_code)]
pub async fn start_edge(
    addr: SocketAddr,
    origin: SocketAddr,
    store: Arc<dyn KeyValueStore>,
    shutdown: &Shutdown,
) {
    let mut config = AppConfig::default();
    config.edge.bind_address = addr.to_string();
    config.edge.origin_address = origin.to_string();

    let server = EdgeServer::new(config, store).unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
}

/// Start a raw HTTP backend whose responses come from `f`.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(addr: SocketAddr, f: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let response_str = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
