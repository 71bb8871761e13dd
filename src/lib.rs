//! Viewer-IP allowlist filter for a CDN edge, and the origin endpoint that
//! reports the forwarded client IP back.

pub mod config;
pub mod edge;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod origin;
pub mod store;

pub use config::AppConfig;
pub use edge::{Decision, EdgeFilter};
pub use http::{EdgeServer, OriginServer};
pub use lifecycle::Shutdown;
pub use store::KeyValueStore;
