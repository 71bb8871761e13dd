//! File-backed store with atomic reload.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::store::{ImportDocument, KeyValueStore, StoreError};

/// Store loaded from an import document on disk.
///
/// Readers see either the old or the new snapshot, never a mix.
pub struct FileStore {
    path: PathBuf,
    snapshot: ArcSwap<HashMap<String, String>>,
}

impl FileStore {
    /// Load the document at `path`. Fails if it cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = read_entries(&path)?;
        Ok(Self {
            path,
            snapshot: ArcSwap::from_pointee(entries),
        })
    }

    /// Re-read the file. On failure the current snapshot is kept.
    pub fn reload(&self) -> Result<usize, StoreError> {
        let entries = read_entries(&self.path)?;
        let len = entries.len();
        self.snapshot.store(Arc::new(entries));
        Ok(len)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }
}

fn read_entries(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    let content = fs::read_to_string(path)?;
    Ok(ImportDocument::parse(&content)?.into_entries())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.snapshot.load().get(key).cloned())
    }
}
