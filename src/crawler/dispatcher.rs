//! The crawl control loop
//!
//! A single dispatcher drains the frontier, asks the dedup table whether each
//! candidate is new, publishes new discoveries, waits on the rate gate and
//! spawns a fetch task per admitted URL. It is the only reader of the frontier
//! and the only writer of the dedup table and the discovered stream.

use crate::crawler::dedup::DedupTable;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{FrontierReceiver, FrontierSender, QueuedUrl};
use crate::crawler::parser::LinkExtractor;
use crate::crawler::rate_gate::RateGate;
use crate::crawler::stats::{CrawlStats, StopReason};
use crate::crawler::task::{FetchTask, TaskOutcome};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Admissions between two progress log lines
const PROGRESS_INTERVAL: u64 = 10;

pub(crate) struct Dispatcher<F, E> {
    pub frontier_tx: FrontierSender,
    pub frontier_rx: FrontierReceiver,
    pub dedup: DedupTable,
    pub gate: RateGate,
    pub discovered: mpsc::Sender<Url>,
    pub cancel: CancellationToken,
    pub fetcher: Arc<F>,
    pub extractor: Arc<E>,
    /// Fetch slots when a concurrency cap is configured
    pub slots: Option<Arc<Semaphore>>,
}

/// Mutable state of a running loop
struct LoopState {
    tasks: JoinSet<TaskOutcome>,
    stats: CrawlStats,
    started: Instant,
}

impl<F: Fetcher, E: LinkExtractor> Dispatcher<F, E> {
    /// Runs until cancellation, exhaustion of the frontier, or the consumer
    /// dropping the discovered stream, and returns the run's statistics
    ///
    /// Entries still queued when the loop stops are dropped. In-flight fetch
    /// tasks are told to stop and awaited before returning.
    pub(crate) async fn run(mut self) -> CrawlStats {
        let mut state = LoopState {
            tasks: JoinSet::new(),
            stats: CrawlStats::default(),
            started: Instant::now(),
        };

        let reason = self.dispatch(&mut state).await;

        // Closing the stream first lets the consumer see the end right away.
        let Dispatcher {
            discovered,
            frontier_rx,
            cancel,
            ..
        } = self;
        drop(discovered);
        drop(frontier_rx);
        cancel.cancel();

        while let Some(joined) = state.tasks.join_next().await {
            record(&mut state.stats, joined);
        }

        state.stats.stop_reason = Some(reason);
        state.stats.elapsed = state.started.elapsed();
        tracing::info!("Crawl stopped: {}", state.stats);

        state.stats
    }

    async fn dispatch(&mut self, state: &mut LoopState) -> StopReason {
        loop {
            let next = if state.tasks.is_empty() {
                // Only fetch tasks feed the frontier, so with none running
                // whatever is queued now is all there will ever be.
                if self.cancel.is_cancelled() {
                    return StopReason::Cancelled;
                }
                match self.frontier_rx.try_dequeue() {
                    Some(item) => item,
                    None => return StopReason::FrontierExhausted,
                }
            } else {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return StopReason::Cancelled,
                    Some(joined) = state.tasks.join_next() => {
                        record(&mut state.stats, joined);
                        continue;
                    }
                    item = self.frontier_rx.dequeue() => match item {
                        Some(item) => item,
                        None => return StopReason::FrontierExhausted,
                    },
                }
            };

            if let Err(reason) = self.admit(next, state).await {
                return reason;
            }
        }
    }

    /// Dedups one candidate and, if new, throttles and spawns its fetch
    async fn admit(&mut self, item: QueuedUrl, state: &mut LoopState) -> Result<(), StopReason> {
        if !self.dedup.try_admit(&item.url) {
            tracing::trace!("Discarding already admitted {}", item.url);
            state.stats.duplicates += 1;
            return Ok(());
        }

        if let Some(found_on) = &item.found_on {
            tracing::debug!("Discovered {} on {}", item.url, found_on);
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(StopReason::Cancelled),
                sent = self.discovered.send(item.url.clone()) => {
                    if sent.is_err() {
                        tracing::info!("Discovered stream closed by consumer");
                        return Err(StopReason::ConsumerClosed);
                    }
                }
            }
            state.stats.discovered += 1;
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(StopReason::Cancelled),
            _ = self.gate.acquire() => {}
        }

        let permit = match &self.slots {
            Some(slots) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(StopReason::Cancelled),
                permit = Arc::clone(slots).acquire_owned() => match permit {
                    Ok(permit) => Some(permit),
                    Err(_) => return Err(StopReason::Cancelled),
                },
            },
            None => None,
        };

        tracing::debug!("Admitting {}", item.url);
        state.tasks.spawn(
            FetchTask {
                url: item.url,
                frontier: self.frontier_tx.clone(),
                fetcher: Arc::clone(&self.fetcher),
                extractor: Arc::clone(&self.extractor),
                cancel: self.cancel.clone(),
                permit,
            }
            .run(),
        );
        state.stats.admitted += 1;

        if state.stats.admitted % PROGRESS_INTERVAL == 0 {
            let elapsed = state.started.elapsed();
            tracing::info!(
                "Progress: {} admitted, {} discovered, {} in flight, {:.2} admissions/sec",
                state.stats.admitted,
                state.stats.discovered,
                state.tasks.len(),
                state.stats.admitted as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
            );
        }

        Ok(())
    }
}

/// Folds a finished fetch task into the run statistics
fn record(stats: &mut CrawlStats, joined: Result<TaskOutcome, JoinError>) {
    match joined {
        Ok(TaskOutcome::Fetched { accepted, rejected }) => {
            stats.fetched += 1;
            stats.links_found += accepted;
            stats.links_rejected += rejected;
        }
        Ok(TaskOutcome::Failed) => stats.failed += 1,
        Ok(TaskOutcome::Aborted) => stats.aborted += 1,
        Err(e) if e.is_cancelled() => stats.aborted += 1,
        Err(e) => {
            tracing::error!("Fetch task panicked: {}", e);
            stats.failed += 1;
        }
    }
}
