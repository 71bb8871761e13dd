//! Client IP echo endpoint.

use axum::{http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::edge::CLIENT_IP_HEADER;
use crate::observability::metrics;

/// Reported when the edge did not forward a client IP.
pub const IP_NOT_FOUND: &str = "IP not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIpResponse {
    pub ip: String,
}

/// The forwarded client IP, if present, non-empty and visible ASCII.
pub fn forwarded_ip(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CLIENT_IP_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// `GET /api/getClientIp`
pub async fn get_client_ip(headers: HeaderMap) -> Json<ClientIpResponse> {
    let ip = match forwarded_ip(&headers) {
        Some(ip) => {
            metrics::record_echo(true);
            ip.to_string()
        }
        None => {
            metrics::record_echo(false);
            IP_NOT_FOUND.to_string()
        }
    };

    tracing::debug!(client_ip = %ip, "Echoing client IP");
    Json(ClientIpResponse { ip })
}
