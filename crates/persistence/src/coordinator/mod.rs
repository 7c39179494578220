//! Persistence coordinator: mirrors the player and settings stores to storage.
//!
//! # Auto-persistence
//!
//! ```text
//! store mutation ──► listener ──► Debouncer::schedule(key)
//!                                      │  (window elapses quietly)
//!                                      ▼
//!                    snapshot of the store at expiry ──► StorageGateway
//! ```
//!
//! Listeners hold only weak references to the stores, and the write reads
//! the snapshot when the timer fires, so whatever was last committed is
//! what lands in storage. Write failures are logged and dropped; the next
//! mutation schedules a fresh attempt.
//!
//! Only the player and settings stores are tracked. UI state is ephemeral
//! and [`is_persistable`] rejects it by name.

mod debounce;

pub use debounce::StoreKey;

use std::sync::{Arc, Weak};

use bubblepop_store::{PlayerStore, SettingsStore, Store, Stores, Subscription};
use chrono::Utc;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

use crate::config::PersistConfig;
use crate::error::{PersistenceError, Result, StorageError};
use crate::gateway::StorageGateway;
use crate::snapshot::{ExportDocument, ImportDocument};
use crate::storage::keys;

use debounce::Debouncer;

/// Name fragments marking a store as ephemeral.
const EPHEMERAL_MARKERS: [&str; 5] = ["uistore", "ui", "modal", "notification", "loading"];

/// True unless `store_name` names ephemeral UI state.
///
/// The match is a case-insensitive substring test, so any name containing
/// `ui` is rejected (including e.g. `"GuildStore"`).
pub fn is_persistable(store_name: &str) -> bool {
    let name = store_name.to_lowercase();
    !EPHEMERAL_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
}

/// Which aggregates [`PersistenceCoordinator::load_persisted_data`] restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadedSections {
    pub player: bool,
    pub settings: bool,
}

impl LoadedSections {
    pub fn any(&self) -> bool {
        self.player || self.settings
    }
}

/// Owns the link between the tracked stores and the storage gateway.
#[derive(Clone)]
pub struct PersistenceCoordinator {
    player: Arc<PlayerStore>,
    settings: Arc<SettingsStore>,
    gateway: StorageGateway,
}

impl PersistenceCoordinator {
    pub fn new(
        player: Arc<PlayerStore>,
        settings: Arc<SettingsStore>,
        gateway: StorageGateway,
    ) -> Self {
        Self {
            player,
            settings,
            gateway,
        }
    }

    /// Track the persisted stores of an application bundle.
    pub fn from_stores(stores: &Stores, gateway: StorageGateway) -> Self {
        Self::new(
            Arc::clone(&stores.player),
            Arc::clone(&stores.settings),
            gateway,
        )
    }

    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    /// Start mirroring store mutations to storage.
    ///
    /// With `config.enabled == false` nothing is subscribed and the returned
    /// handle is inert. Otherwise both stores are observed and each one is
    /// written `config.debounce` after its last mutation.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::RuntimeUnavailable`] when called outside a tokio
    /// runtime; timers need one.
    pub fn setup_auto_persistence(&self, config: PersistConfig) -> Result<AutoPersistence> {
        if !config.enabled {
            info!("Auto-persistence disabled");
            return Ok(AutoPersistence::inert());
        }

        let runtime = Handle::try_current().map_err(|_| PersistenceError::RuntimeUnavailable)?;
        let debouncer = Arc::new(Debouncer::new(runtime, config.debounce));

        let subscriptions = vec![
            self.watch(
                &self.player,
                StoreKey::Player,
                &debouncer,
                |gateway, profile| gateway.save_player_profile(profile),
            ),
            self.watch(
                &self.settings,
                StoreKey::Settings,
                &debouncer,
                |gateway, settings| gateway.save_settings(settings),
            ),
        ];

        info!(
            "Auto-persistence enabled (debounce: {}ms)",
            config.debounce.as_millis()
        );

        Ok(AutoPersistence {
            active: Some(Active {
                subscriptions,
                debouncer,
            }),
        })
    }

    fn watch<S: Store>(
        &self,
        store: &Arc<S>,
        key: StoreKey,
        debouncer: &Arc<Debouncer>,
        save: fn(&StorageGateway, &S::State) -> std::result::Result<(), StorageError>,
    ) -> Subscription {
        let weak_store: Weak<S> = Arc::downgrade(store);
        let weak_debouncer = Arc::downgrade(debouncer);
        let gateway = self.gateway.clone();

        store.subscribe(move |_| {
            let Some(debouncer) = weak_debouncer.upgrade() else {
                return;
            };

            let store = weak_store.clone();
            let gateway = gateway.clone();
            debouncer.schedule(key, move || {
                let Some(store) = store.upgrade() else {
                    return;
                };
                match save(&gateway, &store.snapshot()) {
                    Ok(()) => debug!("Auto-saved {} ({})", key, S::NAME),
                    Err(e) => error!("Failed to auto-save {}: {}", key, e),
                }
            });
        })
    }

    /// Restore persisted aggregates into the stores.
    ///
    /// Missing aggregates leave their store at its current state. Stored but
    /// unreadable data is returned as an error.
    pub fn load_persisted_data(&self) -> Result<LoadedSections> {
        let mut loaded = LoadedSections::default();

        if let Some(profile) = self.gateway.load_player_profile()? {
            self.player.load_player_data(profile);
            loaded.player = true;
        }

        if let Some(settings) = self.gateway.load_settings()? {
            self.settings.load_settings(settings);
            loaded.settings = true;
        }

        info!(
            "Loaded persisted data (player: {}, settings: {}, version: {})",
            loaded.player,
            loaded.settings,
            self.gateway.version().as_deref().unwrap_or("none")
        );

        Ok(loaded)
    }

    /// Remove all persisted data. Failures are logged, never returned;
    /// the result tells whether every key was removed.
    pub fn clear_all_persisted_data(&self) -> bool {
        match self.gateway.clear_all() {
            Ok(()) => {
                info!("Cleared persisted data");
                true
            }
            Err(e) => {
                error!("Failed to clear persisted data: {}", e);
                false
            }
        }
    }

    /// Pretty-printed JSON of the current in-memory player and settings.
    pub fn export_persisted_data(&self) -> Result<String> {
        let document = ExportDocument {
            version: keys::CURRENT_VERSION.to_string(),
            timestamp: Utc::now(),
            player: self.player.snapshot(),
            settings: self.settings.snapshot(),
        };

        serde_json::to_string_pretty(&document).map_err(PersistenceError::Export)
    }

    /// Replace store state from an export document.
    ///
    /// Sections missing from `text` are skipped. The whole document is
    /// decoded before any store is touched, so a rejected import changes
    /// nothing. Stores are replaced without validation.
    pub fn import_persisted_data(&self, text: &str) -> Result<()> {
        let document = ImportDocument::parse(text)?;

        if let Some(version) = document.version.as_deref()
            && version != keys::CURRENT_VERSION
        {
            debug!("Importing data written by version {}", version);
        }

        let player = document.player.is_some();
        let settings = document.settings.is_some();

        if let Some(profile) = document.player {
            self.player.load_player_data(profile);
        }
        if let Some(aggregate) = document.settings {
            self.settings.load_settings(aggregate);
        }

        info!(
            "Imported persisted data (player: {}, settings: {})",
            player, settings
        );
        Ok(())
    }
}

/// Handle returned by [`PersistenceCoordinator::setup_auto_persistence`].
///
/// Dropping the handle tears it down.
pub struct AutoPersistence {
    active: Option<Active>,
}

struct Active {
    subscriptions: Vec<Subscription>,
    debouncer: Arc<Debouncer>,
}

impl AutoPersistence {
    fn inert() -> Self {
        Self { active: None }
    }

    /// True while store mutations are being mirrored to storage.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.debouncer.is_closed())
    }

    /// Number of stores with a write waiting on its debounce window.
    pub fn pending_writes(&self) -> usize {
        self.active
            .as_ref()
            .map_or(0, |active| active.debouncer.pending())
    }

    /// Unsubscribe from both stores and cancel pending writes.
    ///
    /// After this returns no further write happens. Idempotent.
    pub fn teardown(&self) {
        let Some(active) = &self.active else {
            return;
        };
        if active.debouncer.is_closed() {
            return;
        }

        for subscription in &active.subscriptions {
            subscription.unsubscribe();
        }
        active.debouncer.close();
        info!("Auto-persistence stopped");
    }
}

impl Drop for AutoPersistence {
    fn drop(&mut self) {
        self.teardown();
    }
}
