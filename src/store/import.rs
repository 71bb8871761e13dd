//! Store import document.
//!
//! The CDN key/value store is seeded from a JSON document of the form
//! `{"data":[{"key":"allowIps","value":"1.2.3.4,5.6.7.8"}]}`. The same format is
//! read by [`FileStore`](crate::store::FileStore) and produced by the CLI.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::store::{StoreError, ALLOWLIST_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDocument {
    pub data: Vec<ImportEntry>,
}

impl ImportDocument {
    /// A document holding only the allowlist.
    pub fn allowlist<S: AsRef<str>>(ips: &[S]) -> Self {
        let value = ips
            .iter()
            .map(|ip| ip.as_ref().trim())
            .filter(|ip| !ip.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            data: vec![ImportEntry {
                key: ALLOWLIST_KEY.to_string(),
                value,
            }],
        }
    }

    /// Parse and check a document. Keys must be non-empty and unique.
    pub fn parse(json: &str) -> Result<Self, StoreError> {
        let doc: ImportDocument = serde_json::from_str(json)?;
        doc.check()?;
        Ok(doc)
    }

    fn check(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for entry in &self.data {
            if entry.key.is_empty() {
                return Err(StoreError::Import("empty key".to_string()));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(StoreError::Import(format!("duplicate key {:?}", entry.key)));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_entries(self) -> HashMap<String, String> {
        self.data.into_iter().map(|e| (e.key, e.value)).collect()
    }
}
