//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum routers for the edge and the origin
//! - Wire up middleware (edge filter, CORS, limits, timeout, request ID, tracing)
//! - Bind servers to listeners with connect info for the viewer IP
//! - Stop on the shutdown broadcast

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::uri::InvalidUri, middleware, routing::any, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

use crate::config::AppConfig;
use crate::edge::{edge_filter_middleware, forward::forward_handler, EdgeFilter, EdgeSettings, OriginForwarder};
use crate::http::request::with_request_tracing;
use crate::origin;
use crate::store::KeyValueStore;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid origin address: {0}")]
    OriginAddress(#[from] InvalidUri),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Viewer-facing server: filters by IP, then forwards to the origin.
pub struct EdgeServer {
    router: Router,
    config: AppConfig,
}

impl EdgeServer {
    /// Create the edge server. The allowlist store is injected here.
    pub fn new(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ServerError> {
        let filter = EdgeFilter::new(store, EdgeSettings::from_config(&config.edge, &config.store));
        let forwarder = OriginForwarder::new(&config.edge.origin_address)?;

        let router = Self::build_router(&config, filter, forwarder);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, filter: EdgeFilter, forwarder: OriginForwarder) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(forwarder);

        if config.edge.cors_allow_all {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        // The filter wraps every other decision layer: a denied viewer only
        // ever sees 403, never a CORS preflight answer or a 413.
        let router = router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(filter, edge_filter_middleware));

        with_request_tracing(router)
    }

    /// The router, for driving the edge without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.edge.origin_address,
            enforce = self.config.edge.enforce,
            "Edge server starting"
        );

        serve(listener, self.router, shutdown).await?;

        tracing::info!("Edge server stopped");
        Ok(())
    }
}

/// Origin server exposing the echo endpoint.
pub struct OriginServer {
    router: Router,
}

impl OriginServer {
    #[allow(deprecated)]
    pub fn new(config: &AppConfig) -> Self {
        let router = origin::router()
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Self {
            router: with_request_tracing(router),
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Origin server starting");

        serve(listener, self.router, shutdown).await?;

        tracing::info!("Origin server stopped");
        Ok(())
    }
}

async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let app = router.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}
