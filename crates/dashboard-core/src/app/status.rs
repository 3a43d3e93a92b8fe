//! Status - 表示・デバッグ用のシリアライズ可能なビュー

use serde::Serialize;

use crate::domain::format::{format_currency, format_number};
use crate::domain::{
    ActivityItem, DashboardStats, DataOrigin, ErrorKind, MarketSnapshot, SalesSeries, Settings, TaskItem, Theme,
    WeatherReport, WidgetState,
};

/// Serializable view of a widget for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetStatus {
    pub name: String,
    pub loading: bool,
    pub origin: DataOrigin,
    pub last_error: Option<ErrorKind>,
    pub live: u64,
    pub fallback: u64,
    pub skipped: u64,
    pub discarded: u64,
}

/// Stat card texts as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCards {
    pub revenue: String,
    pub users: String,
    pub orders: String,
    pub conversion_rate: String,
}

impl StatCards {
    pub fn from_stats(stats: &DashboardStats) -> Self {
        Self {
            revenue: format_currency(stats.revenue as f64),
            users: format_number(stats.users),
            orders: format_number(stats.orders),
            conversion_rate: format!("{:.2}%", stats.conversion_rate),
        }
    }
}

/// Everything a renderer needs, in one serializable value.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub market: WidgetState<MarketSnapshot>,
    pub cards: StatCards,
    pub activity: WidgetState<Vec<ActivityItem>>,
    pub weather: WidgetState<WeatherReport>,
    pub tasks: Vec<TaskItem>,
    pub settings: Settings,
    pub theme: Theme,
    pub sales: SalesSeries,
    pub widgets: Vec<WidgetStatus>,
}
