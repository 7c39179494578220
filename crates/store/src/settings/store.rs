//! Settings store: merge-style updates over [`SettingsAggregate`].

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use super::types::{
    AudioSettingsPatch, ControlSettingsPatch, GameplaySettingsPatch, GraphicsSettingsPatch,
    Language, SettingsAggregate,
};
use crate::observer::{Subscribers, Subscription};
use crate::Store;

/// Authoritative in-memory user preferences.
///
/// No field is validated; every update succeeds and notifies subscribers.
#[derive(Debug)]
pub struct SettingsStore {
    state: RwLock<SettingsAggregate>,
    subscribers: Subscribers<SettingsAggregate>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::with_settings(SettingsAggregate::default())
    }

    pub fn with_settings(settings: SettingsAggregate) -> Self {
        Self {
            state: RwLock::new(settings),
            subscribers: Subscribers::new(),
        }
    }

    pub fn update_audio_settings(&self, patch: AudioSettingsPatch) {
        self.commit(|settings| patch.apply(&mut settings.audio));
    }

    pub fn update_graphics_settings(&self, patch: GraphicsSettingsPatch) {
        self.commit(|settings| patch.apply(&mut settings.graphics));
    }

    pub fn update_gameplay_settings(&self, patch: GameplaySettingsPatch) {
        self.commit(|settings| patch.apply(&mut settings.gameplay));
    }

    pub fn update_control_settings(&self, patch: ControlSettingsPatch) {
        self.commit(|settings| patch.apply(&mut settings.controls));
    }

    pub fn update_language(&self, language: Language) {
        self.commit(|settings| settings.language = language);
    }

    /// Replace every setting. Used when restoring saved or imported data.
    pub fn load_settings(&self, settings: SettingsAggregate) {
        debug!(language = %settings.language, "loading settings");
        self.commit(|current| *current = settings);
    }

    /// Restore the built-in defaults.
    pub fn reset_settings(&self) {
        debug!("resetting settings");
        self.commit(|current| *current = SettingsAggregate::default());
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SettingsAggregate {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn commit<F>(&self, mutate: F)
    where
        F: FnOnce(&mut SettingsAggregate),
    {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            mutate(&mut state);
            state.clone()
        };
        self.subscribers.notify(&snapshot);
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for SettingsStore {
    type State = SettingsAggregate;

    const NAME: &'static str = "SettingsStore";

    fn snapshot(&self) -> SettingsAggregate {
        SettingsStore::snapshot(self)
    }

    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SettingsAggregate) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }
}
