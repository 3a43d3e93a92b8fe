//! App - アプリケーション層
//!
//! このモジュールは、ports と sources を組み合わせてダッシュボードを動かします。
//!
//! # 主要コンポーネント
//! - **DashboardBuilder**: 設定の検証と ports のワイヤリング
//! - **Dashboard**: ウィジェット・タイマー・セッションの持ち主
//! - **Widget**: DataSource + 状態 + 重複/キャンセルのガード
//! - **RefreshScheduler**: 周期タイマー（重なった tick はスキップ）
//! - **NotificationSimulator**: 疑似リアルタイム通知
//! - **Session / TaskBoard / SalesChart**: 永続化される UI 状態

pub mod builder;
pub mod dashboard;
pub mod persistence;
pub mod sales;
pub mod scheduler;
pub mod session;
pub mod simulation;
pub mod status;
pub mod tasks;
pub mod widget;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, DashboardBuilder};
pub use self::dashboard::{Dashboard, LoadReport, Timer};
pub use self::sales::SalesChart;
pub use self::scheduler::{RefreshScheduler, ScheduleId};
pub use self::session::{Modal, Modals, Session};
pub use self::simulation::NotificationSimulator;
pub use self::status::{DashboardSnapshot, StatCards, WidgetStatus};
pub use self::tasks::TaskBoard;
pub use self::widget::{RefreshReport, Refreshable, Widget};
