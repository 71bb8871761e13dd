//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! edge filter, store, origin
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
