//! Ephemeral UI state. Always starts at its defaults and is never persisted.

mod store;
mod types;

pub use store::UiStore;
pub use types::{
    FocusMode, FocusState, HOME_PAGE, LoadingState, LoadingTarget, Modal, ModalState,
    NewNotification, Notification, NotificationCategory, NotificationKind, NotificationPriority,
    UiState,
};
