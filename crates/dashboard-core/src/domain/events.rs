//! Events - ユーザー向け通知イベント
//!
//! コアは意味のあるイベントだけを出す。描画（トースト、アニメーション）は
//! NotificationSink 側の責務。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Notification はシンクに渡される 1 件の通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// シミュレーション通知の候補メッセージ
pub const SIMULATED_MESSAGES: [&str; 8] = [
    "New user registration",
    "Order completed",
    "Payment processed",
    "Product updated",
    "System maintenance",
    "API request received",
    "Data backup completed",
    "Security scan passed",
];

/// シミュレーション通知の重要度（error は出さない）
pub const SIMULATED_SEVERITIES: [Severity; 3] = [Severity::Info, Severity::Success, Severity::Warning];

/// 1 tick あたりの発火確率
pub const SIMULATION_PROBABILITY: f64 = 0.2;
