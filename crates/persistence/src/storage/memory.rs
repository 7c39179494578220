//! In-memory KeyValueStore implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::BackendError;
use crate::storage::KeyValueStore;

/// In-memory implementation of KeyValueStore.
///
/// An optional quota caps the total size (keys plus values, in bytes) so
/// that write failures can be exercised the way a browser's storage quota
/// would produce them.
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store without a quota.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: None,
        }
    }

    /// Create an empty store that rejects writes growing it past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: Some(bytes),
        }
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            quota: None,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BackendError::LockPoisoned)?;

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = others + key.len() + value.len();
            if requested > limit {
                return Err(BackendError::QuotaExceeded { requested, limit });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BackendError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), BackendError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BackendError::LockPoisoned)?;
        entries.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}
