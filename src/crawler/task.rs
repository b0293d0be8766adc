//! Fetch task: retrieve one page and republish its links

use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{FrontierSender, QueuedUrl};
use crate::crawler::parser::LinkExtractor;
use crate::url::resolve_link;
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How a fetch task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskOutcome {
    /// The page was scanned; counts cover the hrefs on it
    Fetched { accepted: u64, rejected: u64 },
    /// The request failed; the task produced nothing
    Failed,
    /// Shutdown interrupted the task
    Aborted,
}

/// One admitted URL plus the handles needed to process it
pub(crate) struct FetchTask<F, E> {
    pub url: Url,
    pub frontier: FrontierSender,
    pub fetcher: Arc<F>,
    pub extractor: Arc<E>,
    pub cancel: CancellationToken,
    /// Concurrency slot, held only while the request is in flight
    pub permit: Option<OwnedSemaphorePermit>,
}

impl<F: Fetcher, E: LinkExtractor> FetchTask<F, E> {
    /// Fetches the page, then enqueues every acceptable link found on it
    ///
    /// Errors are logged and absorbed here. Nothing is retried and nothing is
    /// reported to the dispatcher beyond the outcome.
    pub(crate) async fn run(self) -> TaskOutcome {
        let FetchTask {
            url,
            frontier,
            fetcher,
            extractor,
            cancel,
            permit,
        } = self;

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Fetch of {} aborted by shutdown", url);
                return TaskOutcome::Aborted;
            }
            result = fetcher.fetch(&url) => result,
        };

        // Waiting on a full frontier must not hold a slot the dispatcher
        // needs before it can drain that frontier.
        drop(permit);

        let body = match fetched {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{}", e);
                return TaskOutcome::Failed;
            }
        };

        let hrefs = extractor.extract(&body);
        drop(body);

        let mut accepted = 0;
        let mut rejected = 0;

        for href in hrefs {
            let link = match resolve_link(&href, &url) {
                Ok(link) => link,
                Err(e) => {
                    tracing::debug!("Skipping href {:?} on {}: {}", href, url, e);
                    rejected += 1;
                    continue;
                }
            };

            let candidate = QueuedUrl::discovered(link, url.clone());
            let queued = tokio::select! {
                biased;
                _ = cancel.cancelled() => return TaskOutcome::Aborted,
                queued = frontier.enqueue(candidate) => queued,
            };

            if let Err(e) = queued {
                tracing::debug!("Stopped scanning {}: {}", url, e);
                return TaskOutcome::Aborted;
            }
            accepted += 1;
        }

        tracing::debug!(
            "Scanned {}: {} links queued, {} rejected",
            url,
            accepted,
            rejected
        );

        TaskOutcome::Fetched { accepted, rejected }
    }
}
