//! UI store. Observable like the others, but nothing persists it.

use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use super::types::{FocusMode, LoadingTarget, Modal, NewNotification, Notification, UiState};
use crate::observer::{Subscribers, Subscription};
use crate::Store;

#[derive(Debug)]
pub struct UiStore {
    state: RwLock<UiState>,
    subscribers: Subscribers<UiState>,
}

impl UiStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(UiState::default()),
            subscribers: Subscribers::new(),
        }
    }

    pub fn set_current_page(&self, page: impl Into<String>) {
        let page = page.into();
        self.commit(|ui| ui.current_page = page);
    }

    pub fn open_modal(&self, modal: Modal) {
        self.commit(|ui| *ui.modals.flag_mut(modal) = true);
    }

    pub fn close_modal(&self, modal: Modal) {
        self.commit(|ui| *ui.modals.flag_mut(modal) = false);
    }

    pub fn toggle_modal(&self, modal: Modal) {
        self.commit(|ui| {
            let flag = ui.modals.flag_mut(modal);
            *flag = !*flag;
        });
    }

    /// Append a notification and return its generated id.
    ///
    /// The list has no cap; entries stay until removed or cleared.
    pub fn add_notification(&self, notification: NewNotification) -> String {
        let now = Utc::now().timestamp_millis();
        let id = format!(
            "notification-{now}-{}",
            hex::encode(rand::random::<[u8; 4]>())
        );
        let entry = Notification {
            id: id.clone(),
            kind: notification.kind,
            message: notification.message,
            title: notification.title,
            timestamp: now,
            duration: notification.duration,
            priority: notification.priority,
            category: notification.category,
            is_read: false,
        };
        self.commit(|ui| ui.notifications.push(entry));
        id
    }

    pub fn remove_notification(&self, id: &str) {
        self.commit(|ui| ui.notifications.retain(|n| n.id != id));
    }

    pub fn mark_notification_read(&self, id: &str) {
        self.commit(|ui| {
            if let Some(notification) = ui.notifications.iter_mut().find(|n| n.id == id) {
                notification.is_read = true;
            }
        });
    }

    pub fn clear_notifications(&self) {
        self.commit(|ui| ui.notifications.clear());
    }

    pub fn unread_notifications(&self) -> usize {
        self.read(|ui| ui.notifications.iter().filter(|n| !n.is_read).count())
    }

    pub fn set_loading(&self, target: LoadingTarget, is_loading: bool) {
        self.commit(|ui| *ui.loading.flag_mut(target) = is_loading);
    }

    /// Move focus to `element`. `None` clears the current element but keeps
    /// the history; `Some` is also appended to the history.
    pub fn set_focus(&self, element: Option<&str>) {
        self.commit(|ui| {
            ui.focus.current_element = element.map(str::to_string);
            if let Some(element) = element {
                ui.focus.focus_history.push(element.to_string());
            }
        });
    }

    pub fn set_focus_visible(&self, visible: bool) {
        self.commit(|ui| ui.focus.is_focus_visible = visible);
    }

    pub fn set_focus_mode(&self, mode: FocusMode) {
        self.commit(|ui| ui.focus.focus_mode = mode);
    }

    pub fn reset_ui_state(&self) {
        self.commit(|ui| *ui = UiState::default());
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> UiState {
        self.read(UiState::clone)
    }

    fn read<R>(&self, f: impl FnOnce(&UiState) -> R) -> R {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn commit<F>(&self, mutate: F)
    where
        F: FnOnce(&mut UiState),
    {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            mutate(&mut state);
            state.clone()
        };
        self.subscribers.notify(&snapshot);
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for UiStore {
    type State = UiState;

    const NAME: &'static str = "UIStore";

    fn snapshot(&self) -> UiState {
        UiStore::snapshot(self)
    }

    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UiState) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }
}
