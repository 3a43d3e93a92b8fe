//! NotificationSink の実装

use std::sync::{Mutex, PoisonError};

use crate::domain::{Notification, Severity};
use crate::ports::NotificationSink;

/// TracingSink は通知をログに流す
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!(
                event = "notification",
                severity = %notification.severity,
                "{}",
                notification.message
            ),
            Severity::Warning => tracing::warn!(
                event = "notification",
                severity = %notification.severity,
                "{}",
                notification.message
            ),
            Severity::Info | Severity::Success => tracing::info!(
                event = "notification",
                severity = %notification.severity,
                "{}",
                notification.message
            ),
        }
    }
}

/// MemorySink は受け取った通知を順番に保持する
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.received().into_iter().map(|n| n.message).collect()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
