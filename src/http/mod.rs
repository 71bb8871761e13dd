//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info)
//!     → request.rs (request ID, trace span)
//!     → edge filter (edge server) / echo handler (origin server)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, with_request_tracing, X_REQUEST_ID};
pub use server::{EdgeServer, OriginServer, ServerError};
