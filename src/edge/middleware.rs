//! Axum middleware applying the edge filter to viewer requests.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::edge::filter::{deny_response, Decision, EdgeFilter};
use crate::http::request::request_id;

pub async fn edge_filter_middleware(
    State(filter): State<EdgeFilter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match filter.evaluate(addr.ip(), req.headers_mut()).await {
        Decision::Allow => next.run(req).await,
        Decision::Deny => {
            tracing::warn!(
                request_id = %request_id(req.headers()),
                viewer_ip = %addr.ip(),
                path = %req.uri().path(),
                "Request denied by IP allowlist"
            );
            deny_response()
        }
    }
}
