//! NotificationSink port - ユーザー向け通知の出口
//!
//! fire-and-forget。戻り値なし、失敗もコアには返さない。
//!
//! # 実装
//! - TracingSink: tracing にログとして流す（CLI 用）
//! - MemorySink: 受け取った通知を溜める（テスト用）

use crate::domain::Notification;

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}
