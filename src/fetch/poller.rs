//! Periodic polling
//!
//! This module is the scheduling layer the coordinator leaves to its caller:
//! - Fetches on a fixed interval with a five minute floor
//! - Never overlaps two fetches on the same coordinator
//! - Stops when the session is rejected, keeps going on transient failures

use crate::fetch::coordinator::{FetchCoordinator, FetchOutcome};
use crate::fetch::transport::Transport;
use crate::FetchError;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Shortest allowed time between two polls
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// What the cycle handler wants the poller to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Continue,
    Stop,
}

/// Why a poll run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured number of cycles ran
    CycleLimit,

    /// The cycle handler asked to stop
    Requested,

    /// A failure retrying cannot fix, such as a missing or rejected session
    Fatal,
}

/// Counters for a finished poll run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub cycles: u64,
    pub successes: u64,
    pub failures: u64,
    pub stopped_by: StopReason,
}

/// Drives a coordinator on a fixed interval
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Poller {
    /// Creates a poller; intervals under [`MIN_POLL_INTERVAL`] are raised to it
    pub fn new(interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                "Poll interval {}s is below the {}s minimum, using the minimum",
                interval.as_secs(),
                MIN_POLL_INTERVAL.as_secs()
            );
        }
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            max_cycles: None,
        }
    }

    /// Stops after `cycles` fetches
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls until the cycle limit, a stop request, or a rejected session
    ///
    /// The first fetch happens immediately. Each fetch completes, and the
    /// handler runs, before the next tick is awaited; a slow fetch delays the
    /// following one instead of causing a burst.
    ///
    /// # Arguments
    ///
    /// * `coordinator` - The coordinator to fetch with
    /// * `session_token` - Token passed to every fetch
    /// * `on_cycle` - Called with the cycle number (from 1) and its result
    pub async fn run<T, F>(
        &self,
        coordinator: &mut FetchCoordinator<T>,
        session_token: &str,
        mut on_cycle: F,
    ) -> PollSummary
    where
        T: Transport,
        F: FnMut(u64, &Result<FetchOutcome, FetchError>) -> PollControl,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut summary = PollSummary {
            cycles: 0,
            successes: 0,
            failures: 0,
            stopped_by: StopReason::CycleLimit,
        };

        loop {
            if let Some(max) = self.max_cycles {
                if summary.cycles >= max {
                    summary.stopped_by = StopReason::CycleLimit;
                    break;
                }
            }

            ticker.tick().await;
            summary.cycles += 1;

            let result = coordinator.fetch(session_token).await;
            match &result {
                Ok(outcome) => {
                    summary.successes += 1;
                    tracing::debug!(
                        "Poll cycle {} returned {} resources",
                        summary.cycles,
                        outcome.records.len()
                    );
                }
                Err(e) => {
                    summary.failures += 1;
                    tracing::warn!("Poll cycle {} failed: {}", summary.cycles, e);
                }
            }

            let control = on_cycle(summary.cycles, &result);

            if result.as_ref().is_err_and(|e| !e.is_retryable()) {
                summary.stopped_by = StopReason::Fatal;
                break;
            }

            if control == PollControl::Stop {
                summary.stopped_by = StopReason::Requested;
                break;
            }
        }

        tracing::info!(
            "Polling stopped after {} cycles ({} ok, {} failed): {:?}",
            summary.cycles,
            summary.successes,
            summary.failures,
            summary.stopped_by
        );
        summary
    }
}
