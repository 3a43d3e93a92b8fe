//! Session - 設定パネル・モーダル・ログアウト・テーマ
//!
//! ログアウトの流れ:
//! 1. "Logging out..." (info)
//! 2. LOGOUT_DELAY 後に保存済みの設定とタスクを消し、"Successfully logged out!"
//! 3. REDIRECT_DELAY 後に "Redirecting to login..."

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domain::{Notification, Settings, Severity, StoreError, Theme};
use crate::ports::{KeyValueStore, NotificationSink};

use super::persistence::{SETTINGS_KEY, TASKS_KEY, THEME_KEY, load_merged, save_json};

pub const LOGOUT_DELAY: Duration = Duration::from_millis(1500);
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Profile,
    Settings,
    LogoutConfirm,
}

/// Which modals are open. Several may be open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Modals {
    pub profile: bool,
    pub settings: bool,
    pub logout_confirm: bool,
}

impl Modals {
    fn slot(&mut self, modal: Modal) -> &mut bool {
        match modal {
            Modal::Profile => &mut self.profile,
            Modal::Settings => &mut self.settings,
            Modal::LogoutConfirm => &mut self.logout_confirm,
        }
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        match modal {
            Modal::Profile => self.profile,
            Modal::Settings => self.settings,
            Modal::LogoutConfirm => self.logout_confirm,
        }
    }
}

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn NotificationSink>,
    settings: Settings,
    theme: Theme,
    modals: Modals,
}

impl Session {
    /// Load persisted settings and theme.
    pub fn load(store: Arc<dyn KeyValueStore>, sink: Arc<dyn NotificationSink>, prefers_dark: bool) -> Self {
        let settings = load_merged(store.as_ref(), SETTINGS_KEY, Settings::default());
        let theme = initial_theme(store.as_ref(), prefers_dark);
        Self {
            store,
            sink,
            settings,
            theme,
            modals: Modals::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edit in place; nothing is persisted until `save_settings`.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn modals(&self) -> Modals {
        self.modals
    }

    pub fn open(&mut self, modal: Modal) {
        *self.modals.slot(modal) = true;
    }

    pub fn close(&mut self, modal: Modal) {
        *self.modals.slot(modal) = false;
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.sink.notify(Notification::new(message, severity));
    }

    /// Persist settings. On success the settings modal closes; on failure it
    /// stays open.
    pub fn save_settings(&mut self) -> Result<(), StoreError> {
        match save_json(self.store.as_ref(), SETTINGS_KEY, &self.settings) {
            Ok(()) => {
                self.notify("Settings saved successfully!", Severity::Success);
                self.close(Modal::Settings);
                Ok(())
            }
            Err(e) => {
                tracing::error!(event = "settings.save_failed", error = %e);
                self.notify("Failed to save settings", Severity::Error);
                Err(e)
            }
        }
    }

    /// Ask for confirmation.
    pub fn logout(&mut self) {
        self.open(Modal::LogoutConfirm);
    }

    /// Clear persisted user data and announce the redirect.
    pub async fn confirm_logout(&mut self) -> Result<(), StoreError> {
        self.notify("Logging out...", Severity::Info);
        tokio::time::sleep(LOGOUT_DELAY).await;

        let cleared = self
            .store
            .remove(TASKS_KEY)
            .and_then(|()| self.store.remove(SETTINGS_KEY));
        if let Err(e) = cleared {
            tracing::error!(event = "session.logout_failed", error = %e);
            self.notify("Logout failed", Severity::Error);
            return Err(e);
        }

        self.notify("Successfully logged out!", Severity::Success);
        self.close(Modal::LogoutConfirm);
        tracing::info!(event = "session.logged_out");

        tokio::time::sleep(REDIRECT_DELAY).await;
        self.notify("Redirecting to login...", Severity::Info);
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip and persist the theme. A failed write keeps the new theme for the
    /// session.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.set(THEME_KEY, self.theme.as_str()) {
            tracing::warn!(event = "theme.save_failed", error = %e);
        }
        self.theme
    }
}

/// Stored theme if valid, otherwise the environment preference.
pub fn initial_theme(store: &dyn KeyValueStore, prefers_dark: bool) -> Theme {
    let stored = match store.get(THEME_KEY) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(event = "store.read_failed", key = THEME_KEY, error = %e);
            None
        }
    };
    stored
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskItem;
    use crate::impls::{MemorySink, MemoryStore};

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }
    }

    fn session(store: Arc<dyn KeyValueStore>) -> (Arc<MemorySink>, Session) {
        let sink = Arc::new(MemorySink::new());
        let session = Session::load(store, sink.clone(), false);
        (sink, session)
    }

    #[test]
    fn save_settings_persists_and_closes_modal() {
        let store = Arc::new(MemoryStore::new());
        let (sink, mut session) = session(store.clone());
        session.open(Modal::Settings);
        session.settings_mut().api.refresh_interval = 60;

        session.save_settings().unwrap();

        assert!(!session.modals().is_open(Modal::Settings));
        assert_eq!(sink.messages(), vec!["Settings saved successfully!"]);
        let reloaded = load_merged(store.as_ref(), SETTINGS_KEY, Settings::default());
        assert_eq!(reloaded.api.refresh_interval, 60);
    }

    #[test]
    fn failed_save_keeps_modal_open() {
        let (sink, mut session) = session(Arc::new(ReadOnlyStore));
        session.open(Modal::Settings);

        assert!(session.save_settings().is_err());
        assert!(session.modals().is_open(Modal::Settings));
        assert_eq!(
            sink.received(),
            vec![Notification::new("Failed to save settings", Severity::Error)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn logout_clears_data_on_schedule() {
        let store = Arc::new(
            MemoryStore::new()
                .with_entry(SETTINGS_KEY, "{}")
                .with_entry(TASKS_KEY, &serde_json::to_string(&vec![TaskItem::new(1, "x", false)]).unwrap())
                .with_entry(THEME_KEY, "dark"),
        );
        let (sink, mut session) = session(store.clone());
        session.logout();
        assert!(session.modals().is_open(Modal::LogoutConfirm));

        let started = tokio::time::Instant::now();
        session.confirm_logout().await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= LOGOUT_DELAY + REDIRECT_DELAY);
        assert!(elapsed < LOGOUT_DELAY + REDIRECT_DELAY + Duration::from_millis(10));

        assert_eq!(
            sink.messages(),
            vec!["Logging out...", "Successfully logged out!", "Redirecting to login..."]
        );
        assert!(!session.modals().is_open(Modal::LogoutConfirm));
        assert_eq!(store.get(SETTINGS_KEY).unwrap(), None);
        assert_eq!(store.get(TASKS_KEY).unwrap(), None);
        // theme is a device preference, not user data
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[tokio::test(start_paused = true)]
    async fn logout_waits_before_clearing() {
        let store = Arc::new(MemoryStore::new().with_entry(TASKS_KEY, "[]"));
        let (sink, mut session) = session(store.clone());

        let logout = tokio::spawn(async move { session.confirm_logout().await });
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(sink.messages(), vec!["Logging out..."]);
        assert!(store.get(TASKS_KEY).unwrap().is_some());

        logout.await.unwrap().unwrap();
        assert_eq!(sink.received().len(), 3);
    }

    #[test]
    fn theme_prefers_stored_value() {
        let store = MemoryStore::new().with_entry(THEME_KEY, "dark");
        assert_eq!(initial_theme(&store, false), Theme::Dark);
        let store = MemoryStore::new().with_entry(THEME_KEY, "purple");
        assert_eq!(initial_theme(&store, true), Theme::Dark);
        assert_eq!(initial_theme(&MemoryStore::new(), false), Theme::Light);
    }

    #[test]
    fn toggle_theme_persists() {
        let store = Arc::new(MemoryStore::new());
        let (_, mut session) = session(store.clone());
        assert_eq!(session.theme(), Theme::Light);
        assert_eq!(session.toggle_theme(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn modals_are_independent() {
        let (_, mut session) = session(Arc::new(MemoryStore::new()));
        session.open(Modal::Profile);
        session.open(Modal::Settings);
        session.close(Modal::Profile);
        assert_eq!(
            session.modals(),
            Modals {
                profile: false,
                settings: true,
                logout_confirm: false
            }
        );
    }
}
