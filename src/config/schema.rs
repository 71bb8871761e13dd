//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge filter
//! and the origin. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Edge server settings (bind address, origin, filter policy).
    pub edge: EdgeConfig,

    /// Origin echo server settings.
    pub origin: OriginConfig,

    /// Allowlist store settings.
    pub store: StoreConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Edge filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Bind address for viewer traffic (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Address of the origin allowed requests are forwarded to.
    pub origin_address: String,

    /// Check viewer IPs against the allowlist. When false every request is
    /// forwarded, but `x-client-ip` is still stamped.
    pub enforce: bool,

    /// Upper bound on a single allowlist lookup, in milliseconds.
    pub lookup_timeout_ms: u64,

    /// Attach an allow-all-origins CORS policy to edge responses.
    pub cors_allow_all: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            origin_address: "127.0.0.1:3000".to_string(),
            enforce: true,
            lookup_timeout_ms: 1000,
            cors_allow_all: true,
        }
    }
}

/// Origin echo server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Where the allowlist comes from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the allowlist is stored under.
    pub allowlist_key: String,

    /// Path to a store import document (`{"data":[{"key":..,"value":..}]}`).
    pub file: Option<String>,

    /// Allowlist entries seeded into an in-memory store.
    pub inline: Vec<String>,

    /// Reload `file` when it changes on disk.
    pub watch: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            allowlist_key: crate::store::ALLOWLIST_KEY.to_string(),
            file: None,
            inline: Vec::new(),
            watch: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
