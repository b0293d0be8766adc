//! Run statistics

use std::fmt;
use std::time::Duration;

/// Why the dispatcher stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The deadline elapsed or the run was cancelled
    Cancelled,
    /// The frontier emptied with no fetch left in flight
    FrontierExhausted,
    /// The consumer of the discovered stream went away
    ConsumerClosed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::Cancelled => "cancelled",
            StopReason::FrontierExhausted => "frontier exhausted",
            StopReason::ConsumerClosed => "consumer closed",
        };
        f.write_str(reason)
    }
}

/// Counters for one crawl run, returned when the dispatcher stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// URLs that passed dedup and the rate gate and were handed to a fetch task
    pub admitted: u64,

    /// Candidates discarded because they had already been admitted
    pub duplicates: u64,

    /// URLs emitted on the discovered stream
    pub discovered: u64,

    /// Fetch tasks that retrieved and scanned their page
    pub fetched: u64,

    /// Fetch tasks that ended on a transport or HTTP error
    pub failed: u64,

    /// Fetch tasks cut short by cancellation
    pub aborted: u64,

    /// Links accepted as candidates across all pages
    pub links_found: u64,

    /// Hrefs discarded as unparsable, fragment-only or non-HTTP
    pub links_rejected: u64,

    /// Set once the dispatcher has stopped
    pub stop_reason: Option<StopReason>,

    /// Wall time from start until the dispatcher stopped
    pub elapsed: Duration,
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} admitted, {} discovered, {} fetched, {} failed, {} aborted, {} duplicates, {} links rejected in {:.2?}",
            self.admitted,
            self.discovered,
            self.fetched,
            self.failed,
            self.aborted,
            self.duplicates,
            self.links_rejected,
            self.elapsed
        )?;
        if let Some(reason) = self.stop_reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}
