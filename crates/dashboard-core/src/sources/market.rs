//! MarketSource - coin prices and the derived headline stats.

use std::sync::Arc;

use async_trait::async_trait;

use super::{DataSource, decode};
use crate::domain::market::{DashboardStats, MarketSnapshot, PriceResponse, TRACKED_ASSETS, round2};
use crate::domain::FetchError;
use crate::ports::{JsonFetcher, RandomSource};

pub struct MarketSource {
    url: String,
    fetcher: Arc<dyn JsonFetcher>,
    rng: Arc<dyn RandomSource>,
}

impl MarketSource {
    /// `endpoint` is the simple-price URL without a query string.
    pub fn new(endpoint: &str, fetcher: Arc<dyn JsonFetcher>, rng: Arc<dyn RandomSource>) -> Self {
        Self {
            url: price_url(endpoint),
            fetcher,
            rng,
        }
    }
}

pub fn price_url(endpoint: &str) -> String {
    format!(
        "{endpoint}?ids={}&vs_currencies=usd&include_24hr_change=true",
        TRACKED_ASSETS.join(",")
    )
}

pub fn parse(body: serde_json::Value) -> Result<MarketSnapshot, FetchError> {
    let prices: PriceResponse = decode(body)?;
    Ok(MarketSnapshot::from_prices(&prices))
}

/// Bounded random stats. The price ticker stays empty.
pub fn fallback_snapshot(rng: &dyn RandomSource) -> MarketSnapshot {
    MarketSnapshot {
        stats: DashboardStats {
            revenue: rng.range_i64(42_750, 52_750),
            users: rng.range_i64(1_234, 1_334),
            orders: rng.range_i64(567, 617),
            conversion_rate: round2(rng.range_f64(2.5, 4.5)),
        },
        prices: Vec::new(),
    }
}

#[async_trait]
impl DataSource for MarketSource {
    type Output = MarketSnapshot;

    fn name(&self) -> &'static str {
        "market"
    }

    async fn fetch_live(&self) -> Result<MarketSnapshot, FetchError> {
        let body = self.fetcher.get_json(&self.url).await?;
        parse(body)
    }

    fn fallback(&self) -> MarketSnapshot {
        fallback_snapshot(self.rng.as_ref())
    }
}
