//! Storage gateway: JSON encoding of each aggregate under its fixed key.
//!
//! # Layout
//!
//! ```text
//! bubblepop:player    → PlayerProfile JSON
//! bubblepop:settings  → SettingsAggregate JSON
//! bubblepop:version   → "1.0.0"
//! ```
//!
//! Every save also stamps the version key. Reads distinguish "nothing
//! stored" (`Ok(None)`) from "stored but unreadable" (`Err`).

use std::sync::Arc;

use bubblepop_store::{PlayerProfile, SettingsAggregate};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ReadFailure, StorageError, WriteFailure};
use crate::snapshot::PersistentData;
use crate::storage::{KeyValueStore, keys};

type Result<T> = std::result::Result<T, StorageError>;

/// Typed access to the persisted aggregates.
#[derive(Clone)]
pub struct StorageGateway {
    backend: Arc<dyn KeyValueStore>,
}

impl StorageGateway {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// The underlying key-value medium.
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    pub fn save_player_profile(&self, profile: &PlayerProfile) -> Result<()> {
        self.save(keys::PLAYER, profile)
    }

    pub fn save_settings(&self, settings: &SettingsAggregate) -> Result<()> {
        self.save(keys::SETTINGS, settings)
    }

    /// Save both aggregates, stopping at the first failure.
    pub fn save_all(&self, profile: &PlayerProfile, settings: &SettingsAggregate) -> Result<()> {
        self.save_player_profile(profile)?;
        self.save_settings(settings)
    }

    pub fn load_player_profile(&self) -> Result<Option<PlayerProfile>> {
        self.load(keys::PLAYER)
    }

    pub fn load_settings(&self) -> Result<Option<SettingsAggregate>> {
        self.load(keys::SETTINGS)
    }

    /// Load both aggregates. Returns `None` unless both are stored.
    pub fn load_all(&self) -> Result<Option<PersistentData>> {
        let player = self.load_player_profile()?;
        let settings = self.load_settings()?;

        Ok(match (player, settings) {
            (Some(player), Some(settings)) => Some(PersistentData {
                version: self
                    .version()
                    .unwrap_or_else(|| keys::CURRENT_VERSION.to_string()),
                player,
                settings,
                loaded_at: Utc::now(),
            }),
            _ => None,
        })
    }

    /// Remove every key the gateway writes.
    pub fn clear_all(&self) -> Result<()> {
        for key in keys::ALL {
            self.backend
                .remove(key)
                .map_err(|source| StorageError::Clear { key, source })?;
        }
        debug!("Cleared all persisted data");
        Ok(())
    }

    /// Stored data-format version.
    ///
    /// Read failures are logged and reported as `None`: a missing or
    /// unreadable version never blocks startup.
    pub fn version(&self) -> Option<String> {
        match self.backend.get(keys::VERSION) {
            Ok(version) => version,
            Err(e) => {
                warn!("Failed to read data version: {}", e);
                None
            }
        }
    }

    /// Probe the medium with a throwaway write and remove.
    pub fn is_available(&self) -> bool {
        self.backend
            .set(keys::PROBE, "test")
            .and_then(|()| self.backend.remove(keys::PROBE))
            .is_ok()
    }

    /// Approximate footprint in bytes: every namespaced key plus its value.
    pub fn size_estimate(&self) -> Result<usize> {
        let read_error = |source| StorageError::Read {
            key: keys::NAMESPACE,
            source: ReadFailure::Backend(source),
        };

        let mut size = 0;
        for key in self.backend.keys().map_err(read_error)? {
            if !key.starts_with(keys::NAMESPACE) {
                continue;
            }
            if let Some(value) = self.backend.get(&key).map_err(read_error)? {
                size += key.len() + value.len();
            }
        }
        Ok(size)
    }

    fn save<T: Serialize>(&self, key: &'static str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Write {
            key,
            source: WriteFailure::Serialize(e),
        })?;

        self.backend
            .set(key, &json)
            .map_err(|e| StorageError::Write {
                key,
                source: e.into(),
            })?;
        self.backend
            .set(keys::VERSION, keys::CURRENT_VERSION)
            .map_err(|e| StorageError::Write {
                key: keys::VERSION,
                source: e.into(),
            })?;

        debug!("Saved {} ({} bytes)", key, json.len());
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>> {
        let raw = self.backend.get(key).map_err(|e| StorageError::Read {
            key,
            source: e.into(),
        })?;

        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            debug!("No data stored under {}", key);
            return Ok(None);
        };

        let value = serde_json::from_str(&raw).map_err(|e| StorageError::Read {
            key,
            source: ReadFailure::Malformed(e),
        })?;

        debug!("Loaded {}", key);
        Ok(Some(value))
    }
}
