//! Market model: crypto quotes and the headline statistics derived from them.
//!
//! The revenue/users/orders numbers shown on the dashboard are not business
//! data. They are a deterministic transform of the coin prices so the cards
//! move when the market moves.

use serde::{Deserialize, Serialize};

/// Asset ids requested from the price endpoint, in display order.
pub const TRACKED_ASSETS: [&str; 3] = ["bitcoin", "ethereum", "binancecoin"];

/// Used when the upstream 24h change is missing or zero.
pub const DEFAULT_CONVERSION_RATE: f64 = 2.5;

/// Headline statistics cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub revenue: i64,
    pub users: i64,
    pub orders: i64,
    pub conversion_rate: f64,
}

/// One row of the price ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinQuote {
    pub name: String,
    pub price: f64,
    pub change: Option<f64>,
}

/// Everything the crypto widget renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub stats: DashboardStats,
    pub prices: Vec<CoinQuote>,
}

/// `{usd, usd_24h_change}` entry of the price endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AssetPrice {
    pub usd: f64,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
}

/// Response of the simple-price endpoint for [`TRACKED_ASSETS`].
///
/// Extra assets in the response are ignored; a missing tracked asset is a
/// parse error.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PriceResponse {
    pub bitcoin: AssetPrice,
    pub ethereum: AssetPrice,
    pub binancecoin: AssetPrice,
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl DashboardStats {
    /// revenue = round(btc * 10), users = round(eth * 5), orders = round(bnb * 2),
    /// conversion_rate = round2(btc 24h change, or 2.5 when absent/zero).
    pub fn derive(prices: &PriceResponse) -> Self {
        let change = prices
            .bitcoin
            .usd_24h_change
            .filter(|c| *c != 0.0 && c.is_finite())
            .unwrap_or(DEFAULT_CONVERSION_RATE);

        Self {
            revenue: (prices.bitcoin.usd * 10.0).round() as i64,
            users: (prices.ethereum.usd * 5.0).round() as i64,
            orders: (prices.binancecoin.usd * 2.0).round() as i64,
            conversion_rate: round2(change),
        }
    }
}

impl MarketSnapshot {
    pub fn from_prices(prices: &PriceResponse) -> Self {
        let quote = |name: &str, asset: &AssetPrice| CoinQuote {
            name: name.to_string(),
            price: asset.usd,
            change: asset.usd_24h_change,
        };

        Self {
            stats: DashboardStats::derive(prices),
            prices: vec![
                quote("Bitcoin", &prices.bitcoin),
                quote("Ethereum", &prices.ethereum),
                quote("BNB", &prices.binancecoin),
            ],
        }
    }
}
