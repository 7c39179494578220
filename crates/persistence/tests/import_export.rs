use std::sync::Arc;

use bubblepop_persistence::{
    FileKeyValueStore, ImportError, InMemoryKeyValueStore, KeyValueStore, PersistenceCoordinator,
    PersistenceError, StorageGateway, keys,
};
use bubblepop_store::{
    GraphicsQuality, GraphicsSettingsPatch, Language, SettingsAggregate, StatisticsIncrement,
    Stores,
};
use tempfile::TempDir;

fn coordinator_with(backend: Arc<dyn KeyValueStore>) -> (Stores, PersistenceCoordinator) {
    let stores = Stores::new();
    let coordinator = PersistenceCoordinator::from_stores(&stores, StorageGateway::new(backend));
    (stores, coordinator)
}

#[test]
fn test_load_with_empty_storage_keeps_defaults() {
    let (stores, coordinator) = coordinator_with(Arc::new(InMemoryKeyValueStore::new()));
    let before = stores.player.snapshot();

    let loaded = coordinator.load_persisted_data().unwrap();

    assert!(!loaded.any());
    assert_eq!(stores.player.snapshot(), before);
    assert_eq!(stores.settings.snapshot(), SettingsAggregate::default());
}

#[test]
fn test_load_with_corrupt_player_fails() {
    let backend = Arc::new(InMemoryKeyValueStore::with_entries([(
        keys::PLAYER,
        "{\"userId\": ",
    )]));
    let (_stores, coordinator) = coordinator_with(backend);

    let err = coordinator.load_persisted_data().unwrap_err();
    match err {
        PersistenceError::Storage(storage) => {
            assert!(storage.is_corrupt_data());
            assert_eq!(storage.key(), keys::PLAYER);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_export_then_import_restores_state() {
    // Source session
    let (source, exporter) = coordinator_with(Arc::new(InMemoryKeyValueStore::new()));
    source.player.update_username("Mika").unwrap();
    source.player.update_level(4, 120).unwrap();
    source
        .player
        .add_to_statistics(
            StatisticsIncrement::default()
                .with_total_score(900)
                .with_games_played(3),
        )
        .unwrap();
    source.settings.update_language(Language::En);
    source.settings.update_graphics_settings(GraphicsSettingsPatch {
        quality: Some(GraphicsQuality::Ultra),
        ..Default::default()
    });

    let exported = exporter.export_persisted_data().unwrap();

    // Fresh session
    let (target, importer) = coordinator_with(Arc::new(InMemoryKeyValueStore::new()));
    importer.import_persisted_data(&exported).unwrap();

    assert_eq!(target.player.snapshot(), source.player.snapshot());
    assert_eq!(target.settings.snapshot(), source.settings.snapshot());
}

#[test]
fn test_partial_import_touches_only_present_section() {
    let (stores, coordinator) = coordinator_with(Arc::new(InMemoryKeyValueStore::new()));
    stores.player.update_username("Keeper").unwrap();
    let player_before = stores.player.snapshot();

    let mut settings = SettingsAggregate::default();
    settings.audio.master_volume = 10;
    let document = serde_json::json!({ "version": "1.0.0", "settings": settings });

    coordinator
        .import_persisted_data(&document.to_string())
        .unwrap();

    assert_eq!(stores.player.snapshot(), player_before);
    assert_eq!(stores.settings.snapshot().audio.master_volume, 10);
}

#[test]
fn test_import_rejects_malformed_documents() {
    let (stores, coordinator) = coordinator_with(Arc::new(InMemoryKeyValueStore::new()));
    let before = stores.settings.snapshot();

    for text in ["", "42", "\"text\"", "{\"settings\": {\"language\": 3}}"] {
        let err = coordinator.import_persisted_data(text).unwrap_err();
        assert!(matches!(err, PersistenceError::Import(_)), "{text:?}");
    }

    let err = coordinator.import_persisted_data("[]").unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Import(ImportError::NotAnObject)
    ));
    assert_eq!(stores.settings.snapshot(), before);
}

#[test]
fn test_file_backend_survives_restart() {
    let temp = TempDir::new().unwrap();

    // First run: save everything
    {
        let backend = Arc::new(FileKeyValueStore::new(temp.path()).unwrap());
        let (stores, coordinator) = coordinator_with(backend);
        stores.player.update_username("Persisted").unwrap();
        stores.settings.update_language(Language::En);
        coordinator
            .gateway()
            .save_all(&stores.player.snapshot(), &stores.settings.snapshot())
            .unwrap();
    }

    // Second run: load from disk
    let backend = Arc::new(FileKeyValueStore::new(temp.path()).unwrap());
    let (stores, coordinator) = coordinator_with(backend);
    let loaded = coordinator.load_persisted_data().unwrap();

    assert!(loaded.player && loaded.settings);
    assert_eq!(stores.player.snapshot().username, "Persisted");
    assert_eq!(stores.settings.snapshot().language, Language::En);
    assert_eq!(coordinator.gateway().version().as_deref(), Some("1.0.0"));

    assert!(coordinator.clear_all_persisted_data());
    assert_eq!(coordinator.gateway().load_all().unwrap(), None);
    assert_eq!(coordinator.gateway().size_estimate().unwrap(), 0);
}
