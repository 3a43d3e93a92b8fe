//! DashboardBuilder - ports の差し替えとワイヤリング
//!
//! # Fail-fast
//! build() の時点で設定を検証する。壊れた設定で起動してから
//! タイマーが暴走する、ということは起こさない。

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::domain::market::MarketSnapshot;
use crate::domain::WeatherReport;
use crate::impls::{FileStore, HttpFetcher, MemoryStore, ThreadRandom, TracingSink};
use crate::ports::{Clock, JsonFetcher, KeyValueStore, NotificationSink, RandomSource, SystemClock};
use crate::sources::{ActivitySource, MarketSource, WeatherSource};

use super::dashboard::Dashboard;
use super::sales::SalesChart;
use super::session::Session;
use super::simulation::NotificationSimulator;
use super::tasks::TaskBoard;
use super::widget::Widget;

/// BuildError は構築時の設定エラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("endpoint `{0}` is empty")]
    MissingEndpoint(&'static str),
    #[error("endpoint `{0}` is not a valid URL")]
    InvalidEndpoint(&'static str),
    #[error("interval `{0}` must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// 使用例
/// ```ignore
/// let mut dashboard = DashboardBuilder::new(config)
///     .fetcher(Arc::new(OfflineFetcher))
///     .build()?;
/// dashboard.start().await;
/// ```
///
/// 指定しなかった port は本番用の実装になる（HTTP, ファイル or メモリ, tracing,
/// thread_rng, システム時刻）。
pub struct DashboardBuilder {
    config: DashboardConfig,
    fetcher: Option<Arc<dyn JsonFetcher>>,
    store: Option<Arc<dyn KeyValueStore>>,
    sink: Option<Arc<dyn NotificationSink>>,
    rng: Option<Arc<dyn RandomSource>>,
    clock: Option<Arc<dyn Clock>>,
    prefers_dark: bool,
}

impl DashboardBuilder {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            fetcher: None,
            store: None,
            sink: None,
            rng: None,
            clock: None,
            prefers_dark: false,
        }
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn JsonFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn rng(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Theme used when nothing is stored.
    pub fn prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    fn validate(&self) -> Result<(), BuildError> {
        let endpoints = &self.config.endpoints;
        for (name, url) in [
            ("prices", &endpoints.prices),
            ("posts", &endpoints.posts),
            ("random_users", &endpoints.random_users),
            ("forecast", &endpoints.forecast),
        ] {
            if url.trim().is_empty() {
                return Err(BuildError::MissingEndpoint(name));
            }
            if reqwest::Url::parse(url).is_err() {
                return Err(BuildError::InvalidEndpoint(name));
            }
        }

        let intervals = &self.config.intervals;
        if intervals.weather_secs == 0 {
            return Err(BuildError::ZeroInterval("weather_secs"));
        }
        if intervals.notification_secs == 0 {
            return Err(BuildError::ZeroInterval("notification_secs"));
        }
        Ok(())
    }

    pub fn build(self) -> Result<Dashboard, BuildError> {
        self.validate()?;

        let config = self.config;
        let fetcher: Arc<dyn JsonFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(config.http.timeout())?),
        };
        let store: Arc<dyn KeyValueStore> = match (self.store, &config.storage.path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileStore::new(path.clone())),
            (None, None) => Arc::new(MemoryStore::new()),
        };
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        let rng = self.rng.unwrap_or_else(|| Arc::new(ThreadRandom));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let endpoints = &config.endpoints;
        let market = Widget::new(
            MarketSource::new(&endpoints.prices, fetcher.clone(), rng.clone()),
            MarketSnapshot::default(),
        );
        let activity = Widget::new(
            ActivitySource::new(&endpoints.posts, &endpoints.random_users, fetcher.clone(), rng.clone()),
            Vec::new(),
        );
        let weather = Widget::new(
            WeatherSource::new(&endpoints.forecast, config.location.clone(), fetcher, rng.clone()),
            WeatherReport::loading(config.location.label.clone()),
        );

        let simulator = NotificationSimulator::new(sink.clone(), rng.clone());
        let session = Session::load(store.clone(), sink, self.prefers_dark);
        let tasks = TaskBoard::load(store, clock.clone());
        let sales = SalesChart::new(clock, rng);

        tracing::debug!(event = "dashboard.built", location = %config.location.label);
        Ok(Dashboard::assemble(
            market,
            activity,
            weather,
            simulator,
            session,
            tasks,
            sales,
            config.intervals,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::OfflineFetcher;
    use rstest::rstest;

    fn offline(config: DashboardConfig) -> DashboardBuilder {
        DashboardBuilder::new(config)
            .fetcher(Arc::new(OfflineFetcher))
            .store(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn builds_with_defaults() {
        assert!(offline(DashboardConfig::default()).build().is_ok());
    }

    #[rstest]
    #[case::weather(|c: &mut DashboardConfig| c.intervals.weather_secs = 0, "weather_secs")]
    #[case::notification(|c: &mut DashboardConfig| c.intervals.notification_secs = 0, "notification_secs")]
    fn zero_interval_is_rejected(#[case] tweak: fn(&mut DashboardConfig), #[case] name: &str) {
        let mut config = DashboardConfig::default();
        tweak(&mut config);
        match offline(config).build() {
            Err(BuildError::ZeroInterval(got)) => assert_eq!(got, name),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected ZeroInterval"),
        }
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let mut config = DashboardConfig::default();
        config.endpoints.forecast = "  ".into();
        let err = offline(config).build().err().unwrap();
        assert!(matches!(err, BuildError::MissingEndpoint("forecast")));
        assert!(err.to_string().contains("forecast"));
    }

    #[test]
    fn unparsable_endpoint_is_rejected() {
        let mut config = DashboardConfig::default();
        config.endpoints.prices = "prices.example/price".into();
        let err = offline(config).build().err().unwrap();
        assert!(matches!(err, BuildError::InvalidEndpoint("prices")));
    }

    #[test]
    fn initial_widgets_show_placeholders() {
        let dashboard = offline(DashboardConfig::default()).build().unwrap();
        let snap = dashboard.snapshot();
        assert!(snap.activity.data.is_empty());
        assert_eq!(snap.weather.data.current.location, "Istanbul, TR");
        assert_eq!(snap.tasks.len(), 5);
    }
}
