//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_decisions_total` (counter): filter outcomes by `decision`
//! - `edge_store_lookup_seconds` (histogram): allowlist lookup latency
//! - `edge_store_errors_total` (counter): failed lookups by `kind`
//! - `origin_echo_total` (counter): echo responses by `found`
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_decision(decision: &'static str) {
    metrics::counter!("edge_decisions_total", "decision" => decision).increment(1);
}

pub fn record_store_lookup(start: Instant) {
    metrics::histogram!("edge_store_lookup_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_store_error(kind: &'static str) {
    metrics::counter!("edge_store_errors_total", "kind" => kind).increment(1);
}

pub fn record_echo(found: bool) {
    let found = if found { "true" } else { "false" };
    metrics::counter!("origin_echo_total", "found" => found).increment(1);
}
