//! Bounded FIFO queue of candidate URLs awaiting admission

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use url::Url;

/// A candidate URL waiting for an admission decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The candidate URL, already resolved and normalized
    pub url: Url,

    /// The page the link was found on; `None` for the seed
    pub found_on: Option<Url>,
}

impl QueuedUrl {
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            found_on: None,
        }
    }

    pub fn discovered(url: Url, found_on: Url) -> Self {
        Self {
            url,
            found_on: Some(found_on),
        }
    }

    pub fn is_seed(&self) -> bool {
        self.found_on.is_none()
    }
}

/// Errors returned when a candidate cannot be queued
///
/// The rejected candidate is handed back to the caller.
#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error("frontier is full, rejected {}", .0.url)]
    Full(QueuedUrl),

    #[error("frontier is closed, rejected {}", .0.url)]
    Closed(QueuedUrl),
}

/// Creates a frontier with room for `capacity` pending candidates
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn frontier(capacity: usize) -> (FrontierSender, FrontierReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (FrontierSender { tx }, FrontierReceiver { rx })
}

/// Producer side of the frontier, cloned into every fetch task
#[derive(Debug, Clone)]
pub struct FrontierSender {
    tx: mpsc::Sender<QueuedUrl>,
}

impl FrontierSender {
    /// Adds a candidate, waiting while the frontier is at capacity
    ///
    /// Fails only once the receiving side has stopped.
    pub async fn enqueue(&self, item: QueuedUrl) -> Result<(), EnqueueError> {
        self.tx
            .send(item)
            .await
            .map_err(|rejected| EnqueueError::Closed(rejected.0))
    }

    /// Adds a candidate without waiting
    pub fn try_enqueue(&self, item: QueuedUrl) -> Result<(), EnqueueError> {
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) => EnqueueError::Full(item),
            TrySendError::Closed(item) => EnqueueError::Closed(item),
        })
    }

    /// Returns true once the receiving side has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the frontier, owned by the dispatcher
#[derive(Debug)]
pub struct FrontierReceiver {
    rx: mpsc::Receiver<QueuedUrl>,
}

impl FrontierReceiver {
    /// Takes the oldest candidate, waiting while the frontier is empty
    ///
    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn dequeue(&mut self) -> Option<QueuedUrl> {
        self.rx.recv().await
    }

    /// Takes the oldest candidate if one is ready
    pub fn try_dequeue(&mut self) -> Option<QueuedUrl> {
        self.rx.try_recv().ok()
    }
}
