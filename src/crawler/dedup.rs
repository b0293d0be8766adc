//! Run-wide record of admitted URLs

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Set of canonical URL strings admitted during one run
///
/// Membership check and insertion happen under a single lock acquisition, so
/// two callers racing on the same URL can never both be told it is new. The
/// lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct DedupTable {
    admitted: Mutex<HashSet<String>>,
}

impl DedupTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true iff this is the first call for `url` in the run
    pub fn try_admit(&self, url: &Url) -> bool {
        // A panic elsewhere cannot leave the set half-updated, so poisoning is ignored.
        let mut admitted = self.admitted.lock().unwrap_or_else(PoisonError::into_inner);
        admitted.insert(url.as_str().to_owned())
    }

    /// Returns true if `url` has already been admitted
    pub fn contains(&self, url: &Url) -> bool {
        let admitted = self.admitted.lock().unwrap_or_else(PoisonError::into_inner);
        admitted.contains(url.as_str())
    }

    /// Number of admitted URLs
    pub fn len(&self) -> usize {
        self.admitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
