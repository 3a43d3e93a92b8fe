//! 疑似リアルタイム通知。tick ごとに一定確率で 1 件流す。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::events::{SIMULATED_MESSAGES, SIMULATED_SEVERITIES, SIMULATION_PROBABILITY};
use crate::domain::{Notification, Severity};
use crate::ports::{NotificationSink, RandomSource, pick};

use super::widget::{RefreshReport, Refreshable};

pub struct NotificationSimulator {
    sink: Arc<dyn NotificationSink>,
    rng: Arc<dyn RandomSource>,
    probability: f64,
}

impl NotificationSimulator {
    pub fn new(sink: Arc<dyn NotificationSink>, rng: Arc<dyn RandomSource>) -> Self {
        Self {
            sink,
            rng,
            probability: SIMULATION_PROBABILITY,
        }
    }

    /// One tick. Returns the notification if one was emitted.
    pub fn tick(&self) -> Option<Notification> {
        if !self.rng.chance(self.probability) {
            return None;
        }
        let message = pick(self.rng.as_ref(), &SIMULATED_MESSAGES)?;
        let severity = pick(self.rng.as_ref(), &SIMULATED_SEVERITIES)
            .copied()
            .unwrap_or(Severity::Info);

        let notification = Notification::new(*message, severity);
        self.sink.notify(notification.clone());
        Some(notification)
    }
}

#[async_trait]
impl Refreshable for NotificationSimulator {
    fn name(&self) -> &str {
        "notifications"
    }

    async fn refresh(&self) -> RefreshReport {
        match self.tick() {
            Some(_) => RefreshReport::Notified,
            None => RefreshReport::Quiet,
        }
    }
}
