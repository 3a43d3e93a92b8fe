//! RefreshScheduler - 周期的に Refreshable を叩くタイマー群
//!
//! - schedule ごとにタイマータスクを 1 本 spawn する
//! - tick ごとに refresh を別タスクで spawn する。重なった tick は Widget 側の
//!   in_flight ガードで Skipped になる（キューしない）
//! - tick の時点で job.ticket() を取ってから spawn する。spawn 直後に cancel
//!   されても、まだ poll されていない refresh は何も書かない
//! - cancel はタイマーを止めた上で job.invalidate() を呼ぶ。進行中の fetch は
//!   走り切るが、その結果は捨てられる
//! - halt はタイマーだけ止める（周期の変更用）。進行中の fetch はそのまま commit する
//!
//! 最初の tick は消費しておく。初回ロードは Dashboard::start が明示的に行う。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::widget::{RefreshReport, Refreshable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(u64);

struct Entry {
    job: Arc<dyn Refreshable>,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

#[derive(Default)]
pub struct RefreshScheduler {
    next_id: u64,
    entries: HashMap<ScheduleId, Entry>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking `job` every `period`. The first tick fires one period
    /// from now.
    pub fn schedule(&mut self, job: Arc<dyn Refreshable>, period: Duration) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(tick_loop(Arc::clone(&job), period, shutdown_rx));
        tracing::info!(
            event = "scheduler.scheduled",
            job = job.name(),
            period_ms = period.as_millis() as u64
        );

        self.entries.insert(
            id,
            Entry {
                job,
                shutdown_tx,
                join,
            },
        );
        id
    }

    /// Stop the timer and invalidate the job. Returns false for unknown ids.
    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        stop(&entry);
        entry.job.invalidate();
        tracing::info!(event = "scheduler.cancelled", job = entry.job.name());
        true
    }

    /// Stop the timer only. A refresh already running still commits.
    pub fn halt(&mut self, id: ScheduleId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        stop(&entry);
        tracing::info!(event = "scheduler.halted", job = entry.job.name());
        true
    }

    pub fn is_scheduled(&self, id: ScheduleId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancel everything and wait for the timer tasks to exit.
    pub async fn shutdown_and_join(mut self) {
        for (_, entry) in self.entries.drain() {
            stop(&entry);
            entry.job.invalidate();
            tracing::info!(event = "scheduler.cancelled", job = entry.job.name());
            let _ = entry.join.await;
        }
    }
}

fn stop(entry: &Entry) {
    // receiver may already be gone if the task panicked
    let _ = entry.shutdown_tx.send(true);
}

/// Spawn one refresh, holding the ticket taken now.
fn spawn_tick(job: &Arc<dyn Refreshable>) -> JoinHandle<RefreshReport> {
    let ticket = job.ticket();
    let job = Arc::clone(job);
    tokio::spawn(async move {
        let report = job.refresh_with(ticket).await;
        tracing::debug!(event = "scheduler.tick", job = job.name(), report = ?report);
        report
    })
}

async fn tick_loop(job: Arc<dyn Refreshable>, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            _ = ticker.tick() => {}
        }
        if *shutdown_rx.borrow() {
            break;
        }

        spawn_tick(&job);
    }
}
