//! Client-side application state for the BubblePop game shell.
//!
//! Each store owns one aggregate and is the only place that aggregate is
//! mutated. Stores are plain instances shared through [`std::sync::Arc`]; the
//! application builds them once (see [`Stores`]) and hands them to whoever
//! needs them.
//!
//! Modules are organized by aggregate:
//! - [`player`] holds the persisted player profile and its validated mutations
//! - [`settings`] holds persisted user preferences with merge-style updates
//! - [`ui`] holds ephemeral UI state that is never persisted
//! - [`observer`] provides the subscribe/unsubscribe registry shared by all stores
pub mod error;
pub mod observer;
pub mod player;
pub mod settings;
pub mod ui;

use std::sync::Arc;

pub use error::{Result, ValidationError};
pub use observer::{Subscribers, Subscription};
pub use player::{PlayerProfile, PlayerStore, StatisticsIncrement, StatisticsUpdate};
pub use settings::{
    AudioSettings, AudioSettingsPatch, ControlSettings, ControlSettingsPatch, Difficulty,
    GameplaySettings, GameplaySettingsPatch, GraphicsQuality, GraphicsSettings,
    GraphicsSettingsPatch, KeyBinding, Language, MouseButton, SettingsAggregate, SettingsStore,
};
pub use ui::{
    FocusMode, FocusState, LoadingState, LoadingTarget, Modal, ModalState, NewNotification,
    Notification, NotificationCategory, NotificationKind, NotificationPriority, UiState, UiStore,
};

/// Common surface of every state store.
///
/// The persistence layer is generic over this trait so it can watch any
/// store without knowing its mutation API.
pub trait Store: Send + Sync + 'static {
    /// Aggregate owned by the store.
    type State: Clone + Send + Sync + 'static;

    /// Human-readable store name, used in logs.
    const NAME: &'static str;

    /// Clone of the current state.
    fn snapshot(&self) -> Self::State;

    /// Register a listener invoked with the new state after every mutation.
    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Self::State) + Send + Sync + 'static;
}

/// The full set of stores for one application process.
#[derive(Clone, Default)]
pub struct Stores {
    pub player: Arc<PlayerStore>,
    pub settings: Arc<SettingsStore>,
    pub ui: Arc<UiStore>,
}

impl Stores {
    /// Create every store at its defaults.
    pub fn new() -> Self {
        Self::default()
    }
}
