//! Widget - DataSource と WidgetState をつなぐ
//!
//! # ガード
//! - `in_flight`: 同じウィジェットの fetch は同時に 1 本だけ。重なった呼び出しは
//!   待たずに Skipped を返す（キューしない）
//! - `generation`: invalidate() のたびに進む。refresh を頼んだ時点の値（ticket）と
//!   begin / commit 時の値が違えば何も書かない（キャンセル後の書き込みを防ぐ）
//!
//! ticket は refresh() を呼んだ瞬間に取る。spawn されたがまだ poll されていない
//! refresh も、その後の invalidate で無効になる。
//!
//! generation の読み書きは watch チャンネルの書き込みロックの中で行うので、
//! 「確認してから commit」の間に invalidate が割り込むことはない。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{DataOrigin, Fetched, WidgetState};
use crate::sources::DataSource;

use super::status::WidgetStatus;

/// What one refresh call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReport {
    /// New data committed.
    Applied(DataOrigin),
    /// Another fetch was still in flight.
    Skipped,
    /// Fetch finished after the widget was invalidated; nothing written.
    Discarded,
    /// Simulation tick emitted a notification.
    Notified,
    /// Simulation tick did nothing.
    Quiet,
}

/// Something the scheduler can tick.
#[async_trait]
pub trait Refreshable: Send + Sync {
    fn name(&self) -> &str;

    async fn refresh(&self) -> RefreshReport;

    /// Token taken when a refresh is requested, before it is spawned.
    fn ticket(&self) -> u64 {
        0
    }

    /// Refresh on behalf of a request made at `ticket`.
    async fn refresh_with(&self, _ticket: u64) -> RefreshReport {
        self.refresh().await
    }

    /// Called when the schedule driving this job is cancelled.
    fn invalidate(&self) {}
}

#[derive(Debug, Default)]
struct Counters {
    live: AtomicU64,
    fallback: AtomicU64,
    skipped: AtomicU64,
    discarded: AtomicU64,
}

pub struct Widget<S: DataSource> {
    source: S,
    state: watch::Sender<WidgetState<S::Output>>,
    in_flight: AtomicBool,
    generation: AtomicU64,
    counters: Counters,
}

impl<S: DataSource> Widget<S> {
    pub fn new(source: S, initial: S::Output) -> Self {
        let (state, _) = watch::channel(WidgetState::new(initial));
        Self {
            source,
            state,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current state (cloned).
    pub fn state(&self) -> WidgetState<S::Output> {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<WidgetState<S::Output>> {
        self.state.subscribe()
    }

    pub fn status(&self) -> WidgetStatus {
        let state = self.state.borrow();
        WidgetStatus {
            name: self.source.name().to_string(),
            loading: state.loading,
            origin: state.origin,
            last_error: state.last_error,
            live: self.counters.live.load(Ordering::Relaxed),
            fallback: self.counters.fallback.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
            discarded: self.counters.discarded.load(Ordering::Relaxed),
        }
    }

    /// Current generation. Pass it to [`Widget::refresh_with`].
    pub fn ticket(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Mark loading unless the widget was invalidated after `ticket`.
    fn begin(&self, ticket: u64) -> bool {
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::Acquire) != ticket {
                return false;
            }
            *s = s.clone().begin();
            true
        })
    }

    /// Commit if nobody invalidated the widget since `ticket`.
    fn commit(&self, ticket: u64, fetched: Fetched<S::Output>) -> bool {
        self.state.send_if_modified(|s| {
            if self.generation.load(Ordering::Acquire) != ticket {
                return false;
            }
            *s = s.clone().complete(fetched);
            true
        })
    }

    /// Drop any in-flight result and clear the loading flag.
    pub fn invalidate(&self) {
        self.state.send_modify(|s| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            *s = s.clone().abandon();
        });
    }

    /// Fetch once and apply the result.
    ///
    /// Never fails. Returns immediately with `Skipped` when a fetch is already
    /// running. The ticket is taken when this is called, not when the returned
    /// future is first polled.
    pub fn refresh(&self) -> impl Future<Output = RefreshReport> + Send + '_ {
        self.refresh_with(self.ticket())
    }

    /// Like [`Widget::refresh`], for a request made at `ticket`. Nothing is
    /// fetched or written if the widget was invalidated since.
    pub async fn refresh_with(&self, ticket: u64) -> RefreshReport {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(event = "widget.skipped", widget = self.source.name());
            return RefreshReport::Skipped;
        }

        if !self.begin(ticket) {
            self.in_flight.store(false, Ordering::Release);
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(event = "widget.stale_request", widget = self.source.name());
            return RefreshReport::Discarded;
        }

        let mut guard = InFlight {
            widget: self,
            started_at: ticket,
            finished: false,
        };

        let fetched = self.source.fetch().await;
        let origin = fetched.origin();
        guard.finished = true;

        if self.commit(guard.started_at, fetched) {
            let counter = match origin {
                DataOrigin::Fallback => &self.counters.fallback,
                _ => &self.counters.live,
            };
            counter.fetch_add(1, Ordering::Relaxed);
            RefreshReport::Applied(origin)
        } else {
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(event = "widget.discarded", widget = self.source.name());
            RefreshReport::Discarded
        }
    }
}

/// Clears `in_flight` however refresh() exits, including when its future is
/// dropped mid-fetch. In that case `loading` is also cleared.
struct InFlight<'a, S: DataSource> {
    widget: &'a Widget<S>,
    started_at: u64,
    finished: bool,
}

impl<S: DataSource> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            let started_at = self.started_at;
            let widget = self.widget;
            widget.state.send_if_modified(|s| {
                if widget.generation.load(Ordering::Acquire) != started_at || !s.loading {
                    return false;
                }
                *s = s.clone().abandon();
                true
            });
        }
        self.widget.in_flight.store(false, Ordering::Release);
    }
}

#[async_trait]
impl<S: DataSource> Refreshable for Widget<S> {
    fn name(&self) -> &str {
        self.source.name()
    }

    async fn refresh(&self) -> RefreshReport {
        Widget::refresh(self).await
    }

    fn ticket(&self) -> u64 {
        Widget::ticket(self)
    }

    async fn refresh_with(&self, ticket: u64) -> RefreshReport {
        Widget::refresh_with(self, ticket).await
    }

    fn invalidate(&self) {
        Widget::invalidate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::domain::market::MarketSnapshot;
    use crate::impls::{OfflineFetcher, SeededRandom, StaticFetcher};
    use crate::sources::MarketSource;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const EP: &str = "https://prices.test/simple/price";

    fn prices() -> serde_json::Value {
        json!({
            "bitcoin": {"usd": 100, "usd_24h_change": 1.0},
            "ethereum": {"usd": 10, "usd_24h_change": 1.0},
            "binancecoin": {"usd": 1, "usd_24h_change": 1.0}
        })
    }

    fn widget(fetcher: Arc<dyn crate::ports::JsonFetcher>) -> Arc<Widget<MarketSource>> {
        let source = MarketSource::new(EP, fetcher, Arc::new(SeededRandom::new(3)));
        Arc::new(Widget::new(source, MarketSnapshot::default()))
    }

    #[tokio::test]
    async fn refresh_applies_live_data() {
        let w = widget(Arc::new(StaticFetcher::new().with_json(EP, prices())));
        assert_eq!(w.refresh().await, RefreshReport::Applied(DataOrigin::Live));

        let state = w.state();
        assert!(!state.loading);
        assert_eq!(state.data.stats.revenue, 1000);
        assert_eq!(w.status().live, 1);
    }

    #[tokio::test]
    async fn refresh_failure_still_applies_a_value() {
        let w = widget(Arc::new(OfflineFetcher));
        assert_eq!(w.refresh().await, RefreshReport::Applied(DataOrigin::Fallback));
        let state = w.state();
        assert!(!state.loading);
        assert_eq!(state.last_error, Some(ErrorKind::Network));
        assert!(state.data.stats.revenue >= 42_750);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_refresh_is_skipped() {
        let fetcher = StaticFetcher::new()
            .with_json(EP, prices())
            .with_delay(EP, Duration::from_millis(100));
        let fetcher = Arc::new(fetcher);
        let w = widget(fetcher.clone());

        let (first, second) = tokio::join!(w.refresh(), w.refresh());
        assert_eq!(first, RefreshReport::Applied(DataOrigin::Live));
        assert_eq!(second, RefreshReport::Skipped);
        assert_eq!(fetcher.calls(EP), 1);
        assert_eq!(w.status().skipped, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_discards_in_flight_result() {
        let fetcher = StaticFetcher::new()
            .with_json(EP, prices())
            .with_delay(EP, Duration::from_millis(100));
        let w = widget(Arc::new(fetcher));

        let task = tokio::spawn({
            let w = w.clone();
            async move { w.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(w.state().loading);

        w.invalidate();
        let after_cancel = w.state();
        assert!(!after_cancel.loading);

        assert_eq!(task.await.unwrap(), RefreshReport::Discarded);
        assert_eq!(w.state(), after_cancel);
        assert_eq!(w.status().discarded, 1);
    }

    #[tokio::test]
    async fn invalidate_before_spawned_refresh_runs_writes_nothing() {
        let fetcher = Arc::new(StaticFetcher::new().with_json(EP, prices()));
        let w = widget(fetcher.clone());
        let before = w.state();

        let ticket = w.ticket();
        let task = tokio::spawn({
            let w = w.clone();
            async move { w.refresh_with(ticket).await }
        });
        // current_thread: the task has not been polled yet
        w.invalidate();

        assert_eq!(task.await.unwrap(), RefreshReport::Discarded);
        assert_eq!(w.state(), before);
        assert_eq!(fetcher.calls(EP), 0);
        assert_eq!(w.status().discarded, 1);

        // a request made after the invalidation goes through
        assert_eq!(w.refresh().await, RefreshReport::Applied(DataOrigin::Live));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_refresh_does_not_leave_loading_stuck() {
        let fetcher = StaticFetcher::new()
            .with_json(EP, prices())
            .with_delay(EP, Duration::from_secs(10));
        let w = widget(Arc::new(fetcher));

        let timed_out = tokio::time::timeout(Duration::from_millis(50), w.refresh()).await;
        assert!(timed_out.is_err());
        assert!(!w.state().loading);
        // in_flight was released, so the next refresh is not skipped
        let next = tokio::time::timeout(Duration::from_millis(50), w.refresh()).await;
        assert!(next.is_err());
        assert_eq!(w.status().skipped, 0);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let w = widget(Arc::new(StaticFetcher::new().with_json(EP, prices())));
        let mut rx = w.subscribe();
        w.refresh().await;
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.origin, DataOrigin::Live);
    }
}
