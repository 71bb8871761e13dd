//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges (timeouts > 0)
//! - Check that allowlist seed entries are IP addresses
//! - Reject conflicting store sources
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("store.allowlist_key must not be empty")]
    EmptyAllowlistKey,

    #[error("store.inline: {0:?} is not an IP address")]
    InvalidInlineIp(String),

    #[error("store.file and store.inline are mutually exclusive")]
    ConflictingStoreSources,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let addresses = [
        ("edge.bind_address", &config.edge.bind_address),
        ("edge.origin_address", &config.edge.origin_address),
        ("origin.bind_address", &config.origin.bind_address),
    ];
    for (field, value) in addresses {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.edge.lookup_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration("edge.lookup_timeout_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.request_secs"));
    }

    if config.store.allowlist_key.trim().is_empty() {
        errors.push(ValidationError::EmptyAllowlistKey);
    }

    for entry in &config.store.inline {
        if entry.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::InvalidInlineIp(entry.clone()));
        }
    }

    if config.store.file.is_some() && !config.store.inline.is_empty() {
        errors.push(ValidationError::ConflictingStoreSources);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
