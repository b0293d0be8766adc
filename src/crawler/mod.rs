//! Crawler module for concurrent, rate-bounded crawling
//!
//! This module contains the crawl-control engine, including:
//! - The run-wide dedup table and the bounded frontier
//! - The global rate gate and the deadline/cancellation controller
//! - The dispatcher loop and the fetch tasks it spawns
//! - HTTP fetching and anchor link extraction

mod cancel;
mod coordinator;
mod dedup;
mod dispatcher;
mod fetcher;
mod frontier;
mod parser;
mod rate_gate;
mod stats;
mod task;

pub use cancel::CancellationController;
pub use coordinator::{crawl, CrawlRun, Crawler};
pub use dedup::DedupTable;
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use frontier::{frontier, EnqueueError, FrontierReceiver, FrontierSender, QueuedUrl};
pub use parser::{AnchorExtractor, Hrefs, LinkExtractor};
pub use rate_gate::RateGate;
pub use stats::{CrawlStats, StopReason};
