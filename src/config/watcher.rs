//! Allowlist file watcher for hot reload.

use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::store::FileStore;

/// Monitors the store file and reloads it when it changes.
pub struct AllowlistWatcher {
    store: Arc<FileStore>,
}

impl AllowlistWatcher {
    pub fn new(store: Arc<FileStore>) -> Self {
        Self { store }
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?store.path(), "Allowlist file change detected, reloading");
                        match store.reload() {
                            Ok(keys) => tracing::info!(keys, "Allowlist store reloaded"),
                            Err(e) => tracing::error!(
                                error = %e,
                                "Failed to reload allowlist store, keeping current snapshot"
                            ),
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(self.store.path(), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.store.path(), "Allowlist watcher started");
        Ok(watcher)
    }
}
