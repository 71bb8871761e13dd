//! Viewer-request IP filter.
//!
//! Runs once per inbound request, before anything is forwarded:
//!
//! 1. take the viewer IP from the connection, never from a header
//! 2. fetch the allowlist from the store (no caching between requests)
//! 3. exact-string membership test
//! 4. allowed: stamp `x-client-ip` with the viewer IP and forward
//! 5. denied: leave headers untouched and answer 403
//!
//! Store failures and slow lookups deny the request.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};

use crate::config::{EdgeConfig, StoreConfig};
use crate::edge::Allowlist;
use crate::observability::metrics;
use crate::store::{KeyValueStore, StoreError};

/// Header carrying the verified viewer IP to the origin.
pub const CLIENT_IP_HEADER: HeaderName = HeaderName::from_static("x-client-ip");

/// Outcome of filtering one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
        }
    }
}

/// Filter policy.
#[derive(Debug, Clone)]
pub struct EdgeSettings {
    /// Store key holding the allowlist.
    pub allowlist_key: String,
    /// When false, membership is not checked.
    pub enforce: bool,
    /// Bound on a single store lookup.
    pub lookup_timeout: Duration,
}

impl EdgeSettings {
    pub fn from_config(edge: &EdgeConfig, store: &StoreConfig) -> Self {
        Self {
            allowlist_key: store.allowlist_key.clone(),
            enforce: edge.enforce,
            lookup_timeout: Duration::from_millis(edge.lookup_timeout_ms),
        }
    }
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self::from_config(&EdgeConfig::default(), &StoreConfig::default())
    }
}

/// The edge filter. Cheap to clone; the store handle is shared.
#[derive(Clone)]
pub struct EdgeFilter {
    store: Arc<dyn KeyValueStore>,
    settings: Arc<EdgeSettings>,
}

impl EdgeFilter {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: EdgeSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    /// Fetch and parse the current allowlist. A missing key is an empty list.
    pub async fn fetch_allowlist(&self) -> Result<Allowlist, StoreError> {
        let start = Instant::now();
        let lookup = self.store.get(&self.settings.allowlist_key);
        let result = tokio::time::timeout(self.settings.lookup_timeout, lookup).await;
        metrics::record_store_lookup(start);

        match result {
            Ok(Ok(value)) => Ok(value.map(|raw| Allowlist::parse(&raw)).unwrap_or_default()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(StoreError::Timeout(self.settings.lookup_timeout)),
        }
    }

    /// Decide whether a request from `viewer_ip` may reach the origin.
    ///
    /// On [`Decision::Allow`] the `x-client-ip` header has been set to the
    /// viewer IP, replacing any client-supplied value. On [`Decision::Deny`]
    /// `headers` is not touched.
    pub async fn evaluate(&self, viewer_ip: IpAddr, headers: &mut HeaderMap) -> Decision {
        let ip = viewer_ip.to_canonical().to_string();

        let decision = if self.settings.enforce {
            self.check(&ip).await
        } else {
            Decision::Allow
        };

        let decision = match decision {
            Decision::Allow => match HeaderValue::from_str(&ip) {
                Ok(value) => {
                    headers.insert(CLIENT_IP_HEADER, value);
                    Decision::Allow
                }
                Err(e) => {
                    tracing::error!(viewer_ip = %ip, error = %e, "Viewer IP is not a valid header value");
                    Decision::Deny
                }
            },
            Decision::Deny => Decision::Deny,
        };

        metrics::record_decision(decision.as_str());
        decision
    }

    async fn check(&self, ip: &str) -> Decision {
        match self.fetch_allowlist().await {
            Ok(allowlist) => {
                if allowlist.contains(ip) {
                    Decision::Allow
                } else {
                    tracing::debug!(viewer_ip = %ip, allowlist_len = allowlist.len(), "Viewer IP not in allowlist");
                    Decision::Deny
                }
            }
            Err(e) => {
                tracing::error!(viewer_ip = %ip, error = %e, "Allowlist lookup failed, denying request");
                metrics::record_store_error(e.kind());
                Decision::Deny
            }
        }
    }
}

/// `403 Forbidden` with no body.
pub fn deny_response() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::FORBIDDEN;
    response
}
