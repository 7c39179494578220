use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bubblepop_persistence::{
    BackendError, InMemoryKeyValueStore, KeyValueStore, PersistConfig, PersistenceCoordinator,
    StorageGateway, keys,
};
use bubblepop_store::{AudioSettingsPatch, Language, PlayerProfile, SettingsAggregate, Stores};
use tokio::time::sleep;

/// Backend that records writes per key and can be switched to fail them.
#[derive(Default)]
struct RecordingStore {
    inner: InMemoryKeyValueStore,
    writes: Mutex<HashMap<String, usize>>,
    failing: AtomicBool,
}

impl RecordingStore {
    fn writes(&self, key: &str) -> usize {
        self.writes.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::QuotaExceeded {
                requested: value.len(),
                limit: 0,
            });
        }
        *self.writes.lock().unwrap().entry(key.to_string()).or_default() += 1;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        self.inner.remove(key)
    }

    fn clear(&self) -> Result<(), BackendError> {
        self.inner.clear()
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        self.inner.keys()
    }
}

fn setup() -> (Stores, Arc<RecordingStore>, PersistenceCoordinator) {
    let stores = Stores::new();
    let backend = Arc::new(RecordingStore::default());
    let coordinator =
        PersistenceCoordinator::from_stores(&stores, StorageGateway::new(backend.clone()));
    (stores, backend, coordinator)
}

fn stored_profile(backend: &RecordingStore) -> PlayerProfile {
    let raw = backend
        .get(keys::PLAYER)
        .unwrap()
        .expect("player profile should be stored");
    serde_json::from_str(&raw).unwrap()
}

fn stored_settings(backend: &RecordingStore) -> SettingsAggregate {
    let raw = backend
        .get(keys::SETTINGS)
        .unwrap()
        .expect("settings should be stored");
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_mutations_is_written_once() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::default())
        .unwrap();

    for ap in 1..=5 {
        stores.player.update_ap(ap).unwrap();
        sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(backend.writes(keys::PLAYER), 0);
    assert_eq!(auto.pending_writes(), 1);

    sleep(Duration::from_millis(500)).await;

    assert_eq!(backend.writes(keys::PLAYER), 1);
    assert_eq!(stored_profile(&backend).ap, 5);
    assert_eq!(
        backend.get(keys::VERSION).unwrap().as_deref(),
        Some(keys::CURRENT_VERSION)
    );

    auto.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_spaced_mutations_are_written_each_time() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::default().with_debounce(Duration::from_millis(50)))
        .unwrap();

    for ap in 1..=3 {
        stores.player.update_ap(ap).unwrap();
        sleep(Duration::from_millis(80)).await;
    }

    assert_eq!(backend.writes(keys::PLAYER), 3);
    assert_eq!(stored_profile(&backend).ap, 3);

    auto.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_stores_are_debounced_independently() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::default())
        .unwrap();

    stores.player.update_username("Alice").unwrap();
    sleep(Duration::from_millis(300)).await;
    stores.settings.update_language(Language::En);
    sleep(Duration::from_millis(300)).await;

    // Settings mutation did not push back the player write.
    assert_eq!(backend.writes(keys::PLAYER), 1);
    assert_eq!(backend.writes(keys::SETTINGS), 0);

    sleep(Duration::from_millis(300)).await;
    assert_eq!(backend.writes(keys::SETTINGS), 1);
    assert_eq!(stored_settings(&backend).language, Language::En);

    auto.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_ui_mutations_are_never_written() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::default())
        .unwrap();

    stores.ui.set_current_page("/shop");
    stores.ui.set_focus(Some("play-button"));
    sleep(Duration::from_secs(1)).await;

    assert!(backend.keys().unwrap().is_empty());
    auto.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_writes() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::default())
        .unwrap();

    stores.player.update_tap(7).unwrap();
    stores.settings.update_audio_settings(AudioSettingsPatch {
        is_muted: Some(true),
        ..Default::default()
    });
    sleep(Duration::from_millis(200)).await;

    auto.teardown();
    auto.teardown();
    assert!(!auto.is_active());

    stores.player.update_tap(8).unwrap();
    sleep(Duration::from_secs(2)).await;

    assert!(backend.keys().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_write_failure_does_not_stop_auto_save() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::default())
        .unwrap();

    backend.fail_writes(true);
    stores.player.update_ap(1).unwrap();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(backend.writes(keys::PLAYER), 0);
    assert_eq!(stores.player.snapshot().ap, 1);

    backend.fail_writes(false);
    stores.player.update_ap(2).unwrap();
    sleep(Duration::from_secs(1)).await;

    assert_eq!(backend.writes(keys::PLAYER), 1);
    assert_eq!(stored_profile(&backend).ap, 2);

    auto.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_rejected_mutation_schedules_nothing() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::default())
        .unwrap();

    assert!(stores.player.update_level(0, 0).is_err());
    assert_eq!(auto.pending_writes(), 0);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(backend.writes(keys::PLAYER), 0);

    auto.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_disabled_config_writes_nothing() {
    let (stores, backend, coordinator) = setup();
    let auto = coordinator
        .setup_auto_persistence(PersistConfig::disabled())
        .unwrap();

    stores.player.update_ap(3).unwrap();
    sleep(Duration::from_secs(1)).await;

    assert!(!auto.is_active());
    assert!(backend.keys().unwrap().is_empty());
}
