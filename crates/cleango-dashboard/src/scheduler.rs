//! Named periodic poll tasks with per-task in-flight guards.
//!
//! # Design
//! - Each task owns a tokio `Interval`; missed ticks are skipped, never burst.
//! - The first tick of every task fires immediately, which doubles as the
//!   initial load.
//! - A firing that lands while the same task is still in flight is refused by
//!   [`PollScheduler::try_begin`] so callers coalesce instead of queueing.

use std::future::poll_fn;
use std::task::Poll;
use std::time::Duration;

use cleango_config::PollingConfig;
use tokio::time::{Interval, MissedTickBehavior, interval};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Poll tasks driven by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollTask {
    /// `GET /api/status`.
    ConnectionStatus,
    /// `GET /api/clean-status`.
    CleanStatus,
    /// `GET /api/stats` together with the current deletion log page.
    StatsAndPage,
}

impl PollTask {
    /// Every task, in scheduling priority order.
    pub const ALL: [Self; 3] = [Self::ConnectionStatus, Self::CleanStatus, Self::StatsAndPage];

    /// Stable name used in logs and metric labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ConnectionStatus => "connection_status",
            Self::CleanStatus => "clean_status",
            Self::StatsAndPage => "stats_and_page",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::ConnectionStatus => 0,
            Self::CleanStatus => 1,
            Self::StatsAndPage => 2,
        }
    }
}

struct Slot {
    task: PollTask,
    ticker: Interval,
    in_flight: bool,
}

/// Timer source for the three poll tasks.
pub struct PollScheduler {
    slots: [Slot; 3],
}

impl PollScheduler {
    /// Build the scheduler from the configured intervals.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(config: &PollingConfig) -> Self {
        Self {
            slots: [
                Slot::new(PollTask::ConnectionStatus, config.status_interval),
                Slot::new(PollTask::CleanStatus, config.clean_status_interval),
                Slot::new(PollTask::StatsAndPage, config.listing_interval),
            ],
        }
    }

    /// Wait for the next task whose interval elapsed.
    ///
    /// Cancel safe: a tick is only consumed when this future completes.
    pub async fn next_due(&mut self) -> PollTask {
        poll_fn(|cx| {
            for slot in &mut self.slots {
                if slot.ticker.poll_tick(cx).is_ready() {
                    return Poll::Ready(slot.task);
                }
            }
            Poll::Pending
        })
        .await
    }

    /// Mark `task` in flight; `false` if the previous firing has not finished.
    pub fn try_begin(&mut self, task: PollTask) -> bool {
        let slot = &mut self.slots[task.index()];
        if slot.in_flight {
            return false;
        }
        slot.in_flight = true;
        true
    }

    /// Clear the in-flight mark of `task`.
    pub fn finish(&mut self, task: PollTask) {
        self.slots[task.index()].in_flight = false;
    }

    /// Whether `task` is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self, task: PollTask) -> bool {
        self.slots[task.index()].in_flight
    }
}

impl Slot {
    fn new(task: PollTask, period: Duration) -> Self {
        let mut ticker = interval(period.max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            task,
            ticker,
            in_flight: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn uniform(secs: u64) -> PollingConfig {
        PollingConfig::uniform(Duration::from_secs(secs))
    }

    #[tokio::test(start_paused = true)]
    async fn every_task_fires_immediately_then_on_cadence() {
        let mut scheduler = PollScheduler::new(&uniform(5));
        let start = Instant::now();

        let mut first = Vec::new();
        for _ in 0..3 {
            first.push(scheduler.next_due().await);
        }
        assert_eq!(first, PollTask::ALL.to_vec());
        assert!(start.elapsed() < Duration::from_millis(1));

        let next = scheduler.next_due().await;
        assert_eq!(next, PollTask::ConnectionStatus);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_millis(5_010));
    }

    #[tokio::test(start_paused = true)]
    async fn tasks_keep_independent_intervals() {
        let config = PollingConfig {
            status_interval: Duration::from_secs(2),
            clean_status_interval: Duration::from_secs(10),
            listing_interval: Duration::from_secs(10),
        };
        let mut scheduler = PollScheduler::new(&config);
        for _ in 0..3 {
            scheduler.next_due().await;
        }

        assert_eq!(scheduler.next_due().await, PollTask::ConnectionStatus);
        assert_eq!(scheduler.next_due().await, PollTask::ConnectionStatus);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_firings_are_refused() {
        let mut scheduler = PollScheduler::new(&uniform(5));
        assert!(scheduler.try_begin(PollTask::StatsAndPage));
        assert!(scheduler.is_in_flight(PollTask::StatsAndPage));
        assert!(!scheduler.try_begin(PollTask::StatsAndPage));
        assert!(scheduler.try_begin(PollTask::CleanStatus));

        scheduler.finish(PollTask::StatsAndPage);
        assert!(!scheduler.is_in_flight(PollTask::StatsAndPage));
        assert!(scheduler.try_begin(PollTask::StatsAndPage));
    }

    #[test]
    fn task_names_are_stable() {
        let names: Vec<_> = PollTask::ALL.iter().map(|task| task.name()).collect();
        assert_eq!(names, ["connection_status", "clean_status", "stats_and_page"]);
    }
}
