//! Global admission throttle

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Periodic token source shared by every admission
///
/// One token is released per period, the first one a full period after
/// creation. A token nobody waits for is lost rather than banked, so a quiet
/// spell never turns into a burst of admissions.
#[derive(Debug)]
pub struct RateGate {
    interval: Interval,
}

impl RateGate {
    /// Creates a gate releasing one token every `period`
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Waits for the next token
    pub async fn acquire(&mut self) {
        self.interval.tick().await;
    }

    /// The interval between tokens
    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}
