//! Settings aggregate, its sub-records, and the patch types used to update them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ============================================================================
// Enumerations
// ============================================================================

/// Interface language.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

/// Rendering quality preset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GraphicsQuality {
    #[default]
    Auto,
    Low,
    Medium,
    High,
    Ultra,
}

/// Game difficulty. Only one level exists today.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
}

/// Mouse button used to pop bubbles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
}

/// Key or keys bound to one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(String),
    Multiple(Vec<String>),
}

// ============================================================================
// Sub-records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettings {
    pub master_volume: u8,
    pub bgm_volume: u8,
    pub sfx_volume: u8,
    pub is_muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 100,
            bgm_volume: 80,
            sfx_volume: 80,
            is_muted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsSettings {
    pub quality: GraphicsQuality,
    pub particle_effects: bool,
    pub screen_shake: bool,
    pub show_damage_numbers: bool,
    pub reduced_motion: bool,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            quality: GraphicsQuality::Auto,
            particle_effects: true,
            screen_shake: true,
            show_damage_numbers: true,
            reduced_motion: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameplaySettings {
    pub difficulty: Difficulty,
    pub auto_save: bool,
    pub show_tutorial_hints: bool,
    pub confirm_purchases: bool,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            auto_save: true,
            show_tutorial_hints: true,
            confirm_purchases: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSettings {
    pub mouse_button: MouseButton,
    pub key_bindings: BTreeMap<String, KeyBinding>,
}

/// Every persisted user preference.
///
/// Sub-records are independent; there are no cross-field invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsAggregate {
    pub audio: AudioSettings,
    pub graphics: GraphicsSettings,
    pub gameplay: GameplaySettings,
    pub language: Language,
    pub controls: ControlSettings,
}

// ============================================================================
// Patches (shallow merge)
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioSettingsPatch {
    pub master_volume: Option<u8>,
    pub bgm_volume: Option<u8>,
    pub sfx_volume: Option<u8>,
    pub is_muted: Option<bool>,
}

impl AudioSettingsPatch {
    pub(crate) fn apply(self, audio: &mut AudioSettings) {
        merge(&mut audio.master_volume, self.master_volume);
        merge(&mut audio.bgm_volume, self.bgm_volume);
        merge(&mut audio.sfx_volume, self.sfx_volume);
        merge(&mut audio.is_muted, self.is_muted);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicsSettingsPatch {
    pub quality: Option<GraphicsQuality>,
    pub particle_effects: Option<bool>,
    pub screen_shake: Option<bool>,
    pub show_damage_numbers: Option<bool>,
    pub reduced_motion: Option<bool>,
}

impl GraphicsSettingsPatch {
    pub(crate) fn apply(self, graphics: &mut GraphicsSettings) {
        merge(&mut graphics.quality, self.quality);
        merge(&mut graphics.particle_effects, self.particle_effects);
        merge(&mut graphics.screen_shake, self.screen_shake);
        merge(&mut graphics.show_damage_numbers, self.show_damage_numbers);
        merge(&mut graphics.reduced_motion, self.reduced_motion);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameplaySettingsPatch {
    pub difficulty: Option<Difficulty>,
    pub auto_save: Option<bool>,
    pub show_tutorial_hints: Option<bool>,
    pub confirm_purchases: Option<bool>,
}

impl GameplaySettingsPatch {
    pub(crate) fn apply(self, gameplay: &mut GameplaySettings) {
        merge(&mut gameplay.difficulty, self.difficulty);
        merge(&mut gameplay.auto_save, self.auto_save);
        merge(&mut gameplay.show_tutorial_hints, self.show_tutorial_hints);
        merge(&mut gameplay.confirm_purchases, self.confirm_purchases);
    }
}

/// A provided `key_bindings` map replaces the whole map; entries are not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSettingsPatch {
    pub mouse_button: Option<MouseButton>,
    pub key_bindings: Option<BTreeMap<String, KeyBinding>>,
}

impl ControlSettingsPatch {
    pub(crate) fn apply(self, controls: &mut ControlSettings) {
        merge(&mut controls.mouse_button, self.mouse_button);
        merge(&mut controls.key_bindings, self.key_bindings);
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let settings = SettingsAggregate::default();
        assert_eq!(settings.audio.master_volume, 100);
        assert_eq!(settings.audio.bgm_volume, 80);
        assert_eq!(settings.audio.sfx_volume, 80);
        assert!(!settings.audio.is_muted);
        assert_eq!(settings.graphics.quality, GraphicsQuality::Auto);
        assert!(settings.graphics.particle_effects);
        assert!(!settings.graphics.reduced_motion);
        assert_eq!(settings.gameplay.difficulty, Difficulty::Normal);
        assert!(settings.gameplay.auto_save);
        assert!(settings.gameplay.show_tutorial_hints);
        assert!(settings.gameplay.confirm_purchases);
        assert_eq!(settings.language, Language::Ja);
        assert_eq!(settings.controls.mouse_button, MouseButton::Left);
        assert!(settings.controls.key_bindings.is_empty());
    }

    #[test]
    fn json_shape_uses_lowercase_enums() {
        let mut settings = SettingsAggregate::default();
        settings.controls.key_bindings.insert(
            "pause".to_string(),
            KeyBinding::Multiple(vec!["Escape".to_string(), "p".to_string()]),
        );
        settings
            .controls
            .key_bindings
            .insert("pop".to_string(), KeyBinding::Single("Space".to_string()));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["language"], json!("ja"));
        assert_eq!(value["graphics"]["quality"], json!("auto"));
        assert_eq!(value["controls"]["mouseButton"], json!("left"));
        assert_eq!(value["controls"]["keyBindings"]["pause"], json!(["Escape", "p"]));
        assert_eq!(value["controls"]["keyBindings"]["pop"], json!("Space"));
        assert_eq!(value["audio"]["isMuted"], json!(false));
    }

    #[test]
    fn enums_parse_from_names() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("ultra".parse::<GraphicsQuality>().unwrap(), GraphicsQuality::Ultra);
        assert_eq!("right".parse::<MouseButton>().unwrap(), MouseButton::Right);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut audio = AudioSettings::default();
        AudioSettingsPatch {
            bgm_volume: Some(10),
            ..Default::default()
        }
        .apply(&mut audio);

        assert_eq!(audio.bgm_volume, 10);
        assert_eq!(audio.master_volume, 100);
        assert_eq!(audio.sfx_volume, 80);
    }
}
