//! Domain model (widget state, market/activity/weather data, settings, ...).
//!
//! ここにあるものはすべて純粋なデータと関数。I/O・乱数・時刻は ports 経由で
//! 呼び出し側から渡す。

pub mod activity;
pub mod chart;
pub mod errors;
pub mod events;
pub mod format;
pub mod market;
pub mod settings;
pub mod state;
pub mod weather;

pub use activity::ActivityItem;
pub use chart::{ChartPeriod, SalesSeries};
pub use errors::{ErrorKind, FetchError, StoreError};
pub use events::{Notification, Severity};
pub use market::{CoinQuote, DashboardStats, MarketSnapshot};
pub use settings::{Settings, TaskItem, Theme};
pub use state::{DataOrigin, Fetched, WidgetState};
pub use weather::{CurrentWeather, ForecastDay, WeatherReport};
