//! URL handling module for Skein
//!
//! This module turns raw strings into canonical absolute URLs. Two URLs are
//! the same crawl target exactly when their canonical serializations are equal.

mod normalize;
mod resolve;

// Re-export main functions
pub use normalize::{is_crawlable_scheme, normalize_parsed, normalize_url};
pub use resolve::resolve_link;
