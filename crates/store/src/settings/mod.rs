//! Persisted user preferences.

mod store;
mod types;

pub use store::SettingsStore;
pub use types::{
    AudioSettings, AudioSettingsPatch, ControlSettings, ControlSettingsPatch, Difficulty,
    GameplaySettings, GameplaySettingsPatch, GraphicsQuality, GraphicsSettings,
    GraphicsSettingsPatch, KeyBinding, Language, MouseButton, SettingsAggregate,
};
