//! Ephemeral UI state: page, modals, notifications, loading flags, focus.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Page shown when the application starts.
pub const HOME_PAGE: &str = "/";

/// Named modal dialogs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Modal {
    Help,
    Settings,
    Shop,
    Account,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalState {
    pub is_help_open: bool,
    pub is_settings_open: bool,
    pub is_shop_open: bool,
    pub is_account_open: bool,
}

impl ModalState {
    pub fn is_open(&self, modal: Modal) -> bool {
        match modal {
            Modal::Help => self.is_help_open,
            Modal::Settings => self.is_settings_open,
            Modal::Shop => self.is_shop_open,
            Modal::Account => self.is_account_open,
        }
    }

    pub(crate) fn flag_mut(&mut self, modal: Modal) -> &mut bool {
        match modal {
            Modal::Help => &mut self.is_help_open,
            Modal::Settings => &mut self.is_settings_open,
            Modal::Shop => &mut self.is_shop_open,
            Modal::Account => &mut self.is_account_open,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
    Achievement,
    LevelUp,
    Challenge,
    System,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationPriority {
    High,
    Medium,
    Low,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationCategory {
    Challenges,
    Achievements,
    System,
}

/// A notification as held by the UI store. `id` and `timestamp` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub title: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Display duration in milliseconds, if the notification auto-dismisses.
    pub duration: Option<u64>,
    pub priority: NotificationPriority,
    pub category: NotificationCategory,
    pub is_read: bool,
}

/// Caller-supplied part of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub message: String,
    pub title: Option<String>,
    pub duration: Option<u64>,
    pub priority: NotificationPriority,
    pub category: NotificationCategory,
}

impl NewNotification {
    /// Medium-priority system notification.
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            title: None,
            duration: None,
            priority: NotificationPriority::Medium,
            category: NotificationCategory::System,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: NotificationCategory) -> Self {
        self.category = category;
        self
    }
}

/// Things that can be loading.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LoadingTarget {
    Game,
    Data,
    Asset,
    Saving,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub is_game_loading: bool,
    pub is_data_loading: bool,
    pub is_asset_loading: bool,
    pub is_saving: bool,
}

impl LoadingState {
    pub fn is_loading(&self, target: LoadingTarget) -> bool {
        match target {
            LoadingTarget::Game => self.is_game_loading,
            LoadingTarget::Data => self.is_data_loading,
            LoadingTarget::Asset => self.is_asset_loading,
            LoadingTarget::Saving => self.is_saving,
        }
    }

    /// True if any target is loading.
    pub fn any(&self) -> bool {
        self.is_game_loading || self.is_data_loading || self.is_asset_loading || self.is_saving
    }

    pub(crate) fn flag_mut(&mut self, target: LoadingTarget) -> &mut bool {
        match target {
            LoadingTarget::Game => &mut self.is_game_loading,
            LoadingTarget::Data => &mut self.is_data_loading,
            LoadingTarget::Asset => &mut self.is_asset_loading,
            LoadingTarget::Saving => &mut self.is_saving,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FocusMode {
    Mouse,
    Keyboard,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusState {
    pub current_element: Option<String>,
    /// Every element that has held focus, oldest first. Never truncated.
    pub focus_history: Vec<String>,
    pub is_focus_visible: bool,
    pub focus_mode: FocusMode,
}

/// Complete UI state. Created fresh at startup, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub current_page: String,
    pub modals: ModalState,
    pub notifications: Vec<Notification>,
    pub loading: LoadingState,
    pub focus: FocusState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_page: HOME_PAGE.to_string(),
            modals: ModalState::default(),
            notifications: Vec::new(),
            loading: LoadingState::default(),
            focus: FocusState::default(),
        }
    }
}
