//! Dashboard - ウィジェット・タイマー・セッションをまとめたもの
//!
//! # タイマー
//! - market: Settings.api.refreshInterval 秒ごと（autoRefresh が false なら無し）
//! - weather: Intervals.weather ごと（常に）
//! - notifications: Intervals.notification ごと（notifications.realtime が false なら無し）
//! - activity: 定期更新なし。start と手動 refresh のときだけ

use std::sync::Arc;
use std::time::Duration;

use crate::config::Intervals;
use crate::domain::StoreError;
use crate::sources::{ActivitySource, MarketSource, WeatherSource};

use super::sales::SalesChart;
use super::scheduler::{RefreshScheduler, ScheduleId};
use super::session::Session;
use super::simulation::NotificationSimulator;
use super::tasks::TaskBoard;
use super::status::{DashboardSnapshot, StatCards, WidgetStatus};
use super::widget::{RefreshReport, Refreshable, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub market: RefreshReport,
    pub activity: RefreshReport,
    pub weather: RefreshReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Market,
    Weather,
    Notifications,
}

#[derive(Default)]
struct Timers {
    market: Option<(ScheduleId, Duration)>,
    weather: Option<(ScheduleId, Duration)>,
    notifications: Option<(ScheduleId, Duration)>,
}

impl Timers {
    fn get(&self, timer: Timer) -> Option<(ScheduleId, Duration)> {
        match timer {
            Timer::Market => self.market,
            Timer::Weather => self.weather,
            Timer::Notifications => self.notifications,
        }
    }

    fn slot(&mut self, timer: Timer) -> &mut Option<(ScheduleId, Duration)> {
        match timer {
            Timer::Market => &mut self.market,
            Timer::Weather => &mut self.weather,
            Timer::Notifications => &mut self.notifications,
        }
    }
}

pub struct Dashboard {
    market: Arc<Widget<MarketSource>>,
    activity: Arc<Widget<ActivitySource>>,
    weather: Arc<Widget<WeatherSource>>,
    simulator: Arc<NotificationSimulator>,
    session: Session,
    tasks: TaskBoard,
    sales: SalesChart,
    intervals: Intervals,
    scheduler: RefreshScheduler,
    timers: Timers,
}

impl Dashboard {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn assemble(
        market: Widget<MarketSource>,
        activity: Widget<ActivitySource>,
        weather: Widget<WeatherSource>,
        simulator: NotificationSimulator,
        session: Session,
        tasks: TaskBoard,
        sales: SalesChart,
        intervals: Intervals,
    ) -> Self {
        Self {
            market: Arc::new(market),
            activity: Arc::new(activity),
            weather: Arc::new(weather),
            simulator: Arc::new(simulator),
            session,
            tasks,
            sales,
            intervals,
            scheduler: RefreshScheduler::new(),
            timers: Timers::default(),
        }
    }

    /// Initial load of every widget, then start the timers.
    pub async fn start(&mut self) -> LoadReport {
        let report = self.refresh_all().await;
        self.apply_timers();
        tracing::info!(event = "dashboard.started", timers = self.scheduler.len());
        report
    }

    /// Refresh every widget concurrently (the manual refresh button).
    pub async fn refresh_all(&self) -> LoadReport {
        let (market, activity, weather) =
            tokio::join!(self.market.refresh(), self.activity.refresh(), self.weather.refresh());
        LoadReport {
            market,
            activity,
            weather,
        }
    }

    pub async fn refresh_market(&self) -> RefreshReport {
        self.market.refresh().await
    }

    pub async fn refresh_activity(&self) -> RefreshReport {
        self.activity.refresh().await
    }

    pub async fn refresh_weather(&self) -> RefreshReport {
        self.weather.refresh().await
    }

    /// Bring the running timers in line with the current settings. Timers
    /// whose period did not change keep running.
    pub fn apply_timers(&mut self) {
        let settings = self.session.settings();
        let market = settings.market_refresh_period();
        let notifications = settings
            .notifications
            .realtime
            .then(|| self.intervals.notification());
        let weather = Some(self.intervals.weather());

        let market_job: Arc<dyn Refreshable> = self.market.clone();
        let weather_job: Arc<dyn Refreshable> = self.weather.clone();
        let simulator_job: Arc<dyn Refreshable> = self.simulator.clone();

        self.set_timer(Timer::Market, market, market_job);
        self.set_timer(Timer::Weather, weather, weather_job);
        self.set_timer(Timer::Notifications, notifications, simulator_job);
    }

    fn set_timer(&mut self, timer: Timer, wanted: Option<Duration>, job: Arc<dyn Refreshable>) {
        let current = self.timers.get(timer);
        if current.map(|(_, period)| period) == wanted {
            return;
        }
        if let Some((id, _)) = current {
            // 周期の変更だけなので進行中の fetch は捨てない
            self.scheduler.halt(id);
        }
        let next = wanted.map(|period| (self.scheduler.schedule(job, period), period));
        *self.timers.slot(timer) = next;
    }

    /// Period of a running timer, None when it is off.
    pub fn timer_period(&self, timer: Timer) -> Option<Duration> {
        self.timers.get(timer).map(|(_, period)| period)
    }

    /// Save settings and reschedule timers if the save succeeded.
    pub fn save_settings(&mut self) -> Result<(), StoreError> {
        self.session.save_settings()?;
        self.apply_timers();
        Ok(())
    }

    pub fn market(&self) -> &Widget<MarketSource> {
        &self.market
    }

    pub fn activity(&self) -> &Widget<ActivitySource> {
        &self.activity
    }

    pub fn weather(&self) -> &Widget<WeatherSource> {
        &self.weather
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn tasks(&self) -> &TaskBoard {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskBoard {
        &mut self.tasks
    }

    pub fn sales(&self) -> &SalesChart {
        &self.sales
    }

    pub fn sales_mut(&mut self) -> &mut SalesChart {
        &mut self.sales
    }

    pub fn status(&self) -> Vec<WidgetStatus> {
        vec![self.market.status(), self.activity.status(), self.weather.status()]
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let market = self.market.state();
        DashboardSnapshot {
            cards: StatCards::from_stats(&market.data.stats),
            market,
            activity: self.activity.state(),
            weather: self.weather.state(),
            tasks: self.tasks.tasks().to_vec(),
            settings: self.session.settings().clone(),
            theme: self.session.theme(),
            sales: self.sales.series().clone(),
            widgets: self.status(),
        }
    }

    /// Stop every timer. In-flight fetches are discarded.
    pub async fn shutdown(self) {
        self.scheduler.shutdown_and_join().await;
        tracing::info!(event = "dashboard.stopped");
    }
}
