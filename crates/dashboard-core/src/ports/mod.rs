//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 外部 API・ストレージ・通知表示・乱数・時刻はすべて trait 越しに使い、
//! 実装（impls）は呼び出し側で差し替える。

pub mod clock;
pub mod fetcher;
pub mod kv_store;
pub mod notification_sink;
pub mod random;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::fetcher::JsonFetcher;
pub use self::kv_store::KeyValueStore;
pub use self::notification_sink::NotificationSink;
pub use self::random::{RandomSource, pick};
