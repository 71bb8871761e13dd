//! Origin application: reports back the client IP stamped by the edge.
//!
//! The origin trusts `x-client-ip` because only the edge can reach it.

pub mod echo;

use axum::{routing::get, Router};

pub use echo::{get_client_ip, ClientIpResponse, IP_NOT_FOUND};

/// Path of the echo endpoint.
pub const ECHO_PATH: &str = "/api/getClientIp";

pub fn router() -> Router {
    Router::new()
        .route(ECHO_PATH, get(get_client_ip))
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "ok"
}
