//! Deadline and external cancellation for a crawl run

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Owns the run's cancellation token and fires it at the deadline
///
/// The token fires on whichever comes first: the time limit elapsing, an
/// explicit [`cancel`](Self::cancel), or the cancellation of a parent token
/// supplied by the caller.
#[derive(Debug)]
pub struct CancellationController {
    token: CancellationToken,
    deadline: Instant,
    timer: JoinHandle<()>,
}

impl CancellationController {
    /// Starts the deadline timer; must be called inside a tokio runtime
    pub fn start(time_limit: Duration, parent: Option<&CancellationToken>) -> Self {
        let token = parent.map_or_else(CancellationToken::new, CancellationToken::child_token);
        let deadline = Instant::now() + time_limit;

        let timer_token = token.clone();
        let timer = tokio::spawn(async move {
            tokio::select! {
                _ = sleep_until(deadline) => {
                    tracing::info!("Time limit of {:?} reached, stopping crawl", time_limit);
                    timer_token.cancel();
                }
                _ = timer_token.cancelled() => {}
            }
        });

        Self {
            token,
            deadline,
            timer,
        }
    }

    /// A handle observers can wait on
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Fires the signal immediately
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns true if the time limit has elapsed
    pub fn deadline_reached(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl Drop for CancellationController {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
