//! dashboard-core
//!
//! Data layer of the live dashboard: widgets that fetch remote snapshots,
//! fall back to plausible values when a fetch fails, and refresh on timers.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（widget state, market/activity/weather, settings, events）
//! - **ports**: 抽象化レイヤー（JsonFetcher, KeyValueStore, NotificationSink, RandomSource, Clock）
//! - **sources**: DataSource 実装（market, activity, weather）
//! - **app**: アプリケーションロジック（widget, scheduler, session, tasks, builder）
//! - **impls**: ports の実装（HTTP, ファイル/メモリストア, テスト用 fetcher など）
//! - **config**: 起動設定（figment）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod sources;

pub use app::{Dashboard, DashboardBuilder};
pub use config::DashboardConfig;
