//! Key/value store holding the allowlist.
//!
//! # Data Flow
//! ```text
//! import document (JSON) ──▶ file.rs (FileStore, hot swappable snapshot)
//! inline config entries  ──▶ memory.rs (InMemoryStore)
//!                                  │
//!                                  ▼
//!                      Arc<dyn KeyValueStore>
//!                                  │
//!                                  ▼
//!                     edge filter: get("allowIps")
//! ```
//!
//! # Design Decisions
//! - The store is a capability handed to the filter at construction time
//! - Values are opaque strings; the edge decides how to parse them
//! - Lookups are async so remote stores can be slotted in

pub mod file;
pub mod import;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StoreConfig;

pub use file::FileStore;
pub use import::{ImportDocument, ImportEntry};
pub use memory::InMemoryStore;

/// Key the allowlist is published under.
pub const ALLOWLIST_KEY: &str = "allowIps";

/// Errors that can occur while reading a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Lookup did not finish in time.
    #[error("store lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Import document is well-formed JSON but semantically invalid.
    #[error("invalid import document: {0}")]
    Import(String),
}

impl StoreError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Timeout(_) => "timeout",
            StoreError::Io(_) => "io",
            StoreError::Parse(_) => "parse",
            StoreError::Import(_) => "import",
        }
    }
}

/// Read access to a key/value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Build the store described by the configuration.
///
/// Returns the file store separately so callers can attach a watcher to it.
pub fn from_config(
    config: &StoreConfig,
) -> Result<(Arc<dyn KeyValueStore>, Option<Arc<FileStore>>), StoreError> {
    if let Some(path) = &config.file {
        let store = Arc::new(FileStore::open(path)?);
        tracing::info!(path = %path, keys = store.len(), "Loaded allowlist store from file");
        return Ok((store.clone(), Some(store)));
    }

    let store = InMemoryStore::new();
    if !config.inline.is_empty() {
        store.put(config.allowlist_key.clone(), config.inline.join(","));
    }
    tracing::info!(entries = config.inline.len(), "Using in-memory allowlist store");
    Ok((Arc::new(store), None))
}
