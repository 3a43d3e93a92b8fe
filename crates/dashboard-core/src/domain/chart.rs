//! Sales chart series. Only the data; drawing belongs to the chart library.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl ChartPeriod {
    pub fn days(self) -> usize {
        match self {
            ChartPeriod::Week => 7,
            ChartPeriod::Month => 30,
            ChartPeriod::Quarter => 90,
        }
    }
}

/// Base value of the synthetic series.
pub const SALES_BASE: f64 = 1000.0;
/// Upward trend per day.
pub const SALES_TREND: f64 = 10.0;
/// Half-width of the random variation.
pub const SALES_JITTER: f64 = 250.0;

/// `"Oct 16"`-style labels ending with `today`.
pub fn labels(today: NaiveDate, period: ChartPeriod) -> Vec<String> {
    (0..period.days())
        .rev()
        .map(|back| {
            today
                .checked_sub_days(Days::new(back as u64))
                .unwrap_or(today)
                .format("%b %-d")
                .to_string()
        })
        .collect()
}

/// Value of the `index`-th point given a variation in [-250, 250).
pub fn sales_point(index: usize, variation: f64) -> f64 {
    (SALES_BASE + SALES_TREND * index as f64 + variation).max(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSeries {
    pub period: ChartPeriod,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}
