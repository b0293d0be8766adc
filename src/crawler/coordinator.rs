//! Crawler coordinator - run setup and the consumer-facing handle
//!
//! This module wires one run together:
//! - Validating the seed and run options
//! - Creating the dedup table, frontier, rate gate and deadline
//! - Spawning the dispatcher
//! - Exposing the discovered stream to the caller

use crate::config::{validate_crawler_config, Config, CrawlerConfig};
use crate::crawler::cancel::CancellationController;
use crate::crawler::dedup::DedupTable;
use crate::crawler::dispatcher::Dispatcher;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{frontier, QueuedUrl};
use crate::crawler::parser::{AnchorExtractor, LinkExtractor};
use crate::crawler::rate_gate::RateGate;
use crate::crawler::stats::CrawlStats;
use crate::url::normalize_url;
use crate::SkeinError;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A configured crawler, ready to start one run
pub struct Crawler<F = HttpFetcher, E = AnchorExtractor> {
    config: CrawlerConfig,
    fetcher: F,
    extractor: E,
}

impl Crawler {
    /// Creates a crawler that fetches over HTTP and extracts anchor links
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to start
    /// * `Err(SkeinError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, SkeinError> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::with_parts(config.crawler.clone(), fetcher, AnchorExtractor))
    }
}

impl<F: Fetcher, E: LinkExtractor> Crawler<F, E> {
    /// Creates a crawler from explicit collaborators
    pub fn with_parts(config: CrawlerConfig, fetcher: F, extractor: E) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Starts a run whose only stop signal is its time limit
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlRun)` - The run is underway
    /// * `Err(SkeinError::SeedParse)` - The seed is not an absolute http(s) URL
    /// * `Err(SkeinError::Config)` - Another run option is invalid
    pub fn start(self) -> Result<CrawlRun, SkeinError> {
        self.launch(None)
    }

    /// Starts a run that also stops when `cancel` fires
    pub fn start_with_cancel(self, cancel: &CancellationToken) -> Result<CrawlRun, SkeinError> {
        self.launch(Some(cancel))
    }

    fn launch(self, parent: Option<&CancellationToken>) -> Result<CrawlRun, SkeinError> {
        let seed = normalize_url(&self.config.seed_url).map_err(|source| SkeinError::SeedParse {
            url: self.config.seed_url.clone(),
            source,
        })?;
        validate_crawler_config(&self.config)?;

        let (frontier_tx, frontier_rx) = frontier(self.config.frontier_capacity);
        frontier_tx.try_enqueue(QueuedUrl::seed(seed.clone()))?;

        let (discovered_tx, discovered_rx) = mpsc::channel(self.config.discovered_buffer);
        let controller = CancellationController::start(self.config.time_limit, parent);

        tracing::info!(
            "Starting crawl from {} (rate {:?}, time limit {:?}, concurrency cap {})",
            seed,
            self.config.rate,
            self.config.time_limit,
            self.config
                .concurrency_cap
                .map_or_else(|| "none".to_string(), |cap| cap.to_string())
        );

        let dispatcher = Dispatcher {
            frontier_tx,
            frontier_rx,
            dedup: DedupTable::new(),
            gate: RateGate::new(self.config.rate),
            discovered: discovered_tx,
            cancel: controller.token(),
            fetcher: Arc::new(self.fetcher),
            extractor: Arc::new(self.extractor),
            slots: self
                .config
                .concurrency_cap
                .map(|cap| Arc::new(Semaphore::new(cap))),
        };

        Ok(CrawlRun {
            seed,
            discovered: discovered_rx,
            dispatcher: tokio::spawn(dispatcher.run()),
            controller,
        })
    }
}

/// Handle to a running crawl
///
/// Yields each newly discovered URL exactly once. The stream ends when the
/// run stops: at its deadline, on cancellation, or when no work is left.
pub struct CrawlRun {
    seed: Url,
    discovered: mpsc::Receiver<Url>,
    dispatcher: JoinHandle<CrawlStats>,
    controller: CancellationController,
}

impl CrawlRun {
    /// The canonical seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Waits for the next discovered URL, or `None` once the run has stopped
    pub async fn next(&mut self) -> Option<Url> {
        self.discovered.recv().await
    }

    /// Stops the run; the stream ends shortly after
    pub fn cancel(&self) {
        self.controller.cancel();
    }

    /// A token that fires when the run stops for any reason
    pub fn cancellation(&self) -> CancellationToken {
        self.controller.token()
    }

    pub fn deadline(&self) -> Instant {
        self.controller.deadline()
    }

    /// Stops consuming, winds the run down and returns its statistics
    pub async fn finish(self) -> CrawlStats {
        let CrawlRun {
            discovered,
            dispatcher,
            controller,
            ..
        } = self;
        drop(discovered);
        controller.cancel();

        match dispatcher.await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!("Dispatcher task failed: {}", e);
                CrawlStats::default()
            }
        }
    }
}

/// Runs a complete crawl, writing each discovered URL to stdout
///
/// This is the main entry point used by the binary. It will:
/// 1. Build the HTTP client
/// 2. Start a run from the configured seed
/// 3. Print every discovered URL, one per line, as it arrives
/// 4. Return the run statistics once the time limit passes, `cancel` fires,
///    or the crawl runs out of links
///
/// # Example
///
/// ```no_run
/// use skein::config::Config;
/// use skein::crawler::crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::new("https://example.com/");
/// let stats = crawl(config, CancellationToken::new()).await?;
/// println!("{}", stats);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, cancel: CancellationToken) -> Result<CrawlStats, SkeinError> {
    let mut run = Crawler::new(&config)?.start_with_cancel(&cancel)?;
    let mut stdout = tokio::io::stdout();

    while let Some(url) = run.next().await {
        let line = format!("{}\n", url);
        if let Err(e) = stdout.write_all(line.as_bytes()).await {
            run.cancel();
            run.finish().await;
            return Err(e.into());
        }
    }
    stdout.flush().await?;

    Ok(run.finish().await)
}
