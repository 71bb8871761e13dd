//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared by value with edge and origin servers
//!
//! Allowlist changes:
//!     watcher.rs detects change to the store file
//!     → FileStore::reload
//!     → atomic swap of the store snapshot
//!     → next lookup observes new allowlist
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the allowlist lives in the store, not here
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::AppConfig;
pub use schema::EdgeConfig;
pub use schema::ObservabilityConfig;
pub use schema::OriginConfig;
pub use schema::StoreConfig;
