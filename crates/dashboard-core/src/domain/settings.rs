//! Persisted user preferences, task list and theme.
//!
//! Field names serialize in camelCase so stored records keep the same keys as
//! the settings panel (`refreshInterval`, `autoRefresh`, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub realtime: bool,
    pub email: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    /// Seconds between market refreshes.
    pub refresh_interval: u64,
    pub auto_refresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub animations: bool,
    pub compact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub notifications: NotificationSettings,
    pub api: ApiSettings,
    pub dashboard: DisplaySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: NotificationSettings {
                realtime: true,
                email: false,
            },
            api: ApiSettings {
                refresh_interval: 30,
                auto_refresh: true,
            },
            dashboard: DisplaySettings {
                animations: true,
                compact: false,
            },
        }
    }
}

impl Settings {
    /// Market refresh period, or None when auto refresh is off.
    pub fn market_refresh_period(&self) -> Option<std::time::Duration> {
        (self.api.auto_refresh && self.api.refresh_interval > 0)
            .then(|| std::time::Duration::from_secs(self.api.refresh_interval))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl TaskItem {
    pub fn new(id: u64, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }
}

/// Task list shown before anything has been saved.
pub fn default_tasks() -> Vec<TaskItem> {
    vec![
        TaskItem::new(1, "Review customer feedback", false),
        TaskItem::new(2, "Update product descriptions", true),
        TaskItem::new(3, "Prepare monthly report", false),
        TaskItem::new(4, "Schedule team meeting", false),
        TaskItem::new(5, "Optimize database queries", true),
    ]
}

/// Stored as the bare strings `"light"` / `"dark"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
