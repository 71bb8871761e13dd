//! Edge subsystem: the viewer-request IP filter.
//!
//! # Data Flow
//! ```text
//! Viewer request (connection IP from ConnectInfo)
//!     → middleware.rs (apply filter)
//!     → filter.rs (store lookup, allowlist.rs membership test)
//!         ├─ deny  → 403 Forbidden, nothing forwarded
//!         └─ allow → x-client-ip stamped
//!     → forward.rs (proxy to origin, stream response back)
//! ```
//!
//! # Design Decisions
//! - Viewer IP comes from the connection, never from request headers
//! - The edge is the only writer of `x-client-ip`
//! - Fail closed: store errors and timeouts deny

pub mod allowlist;
pub mod filter;
pub mod forward;
pub mod middleware;

pub use allowlist::Allowlist;
pub use filter::{deny_response, Decision, EdgeFilter, EdgeSettings, CLIENT_IP_HEADER};
pub use forward::OriginForwarder;
pub use middleware::edge_filter_middleware;
