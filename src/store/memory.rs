//! In-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::{KeyValueStore, StoreError};

/// A thread-safe map of key → value.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default, Debug)]
pub struct InMemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (k, v) in entries {
            store.put(k, v);
        }
        store
    }

    /// Insert or replace a value.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Remove a key, returning its previous value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.inner.remove(key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_operations() {
        let store = InMemoryStore::new();
        assert!(store.get("allowIps").await.unwrap().is_none());

        store.put("allowIps", "10.0.0.1");
        assert_eq!(store.get("allowIps").await.unwrap().as_deref(), Some("10.0.0.1"));

        // Clones observe the same map
        let shared = store.clone();
        shared.put("allowIps", "10.0.0.2");
        assert_eq!(store.get("allowIps").await.unwrap().as_deref(), Some("10.0.0.2"));

        assert_eq!(store.remove("allowIps").as_deref(), Some("10.0.0.2"));
        assert!(store.is_empty());
    }
}
