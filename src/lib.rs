//! Skein: a bounded-rate concurrent web crawler
//!
//! Starting from a seed URL, this crate fetches pages, extracts their anchor
//! links and schedules every newly discovered absolute URL for fetching,
//! emitting each unique URL exactly once until a time budget expires.

pub mod config;
pub mod crawler;
pub mod url;

use thiserror::Error;

/// Main error type for Skein operations
#[derive(Debug, Error)]
pub enum SkeinError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{url}': {source}")]
    SeedParse { url: String, source: UrlError },

    #[error("Frontier error: {0}")]
    Frontier(#[from] crawler::EnqueueError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

/// URL-specific errors
///
/// Raised for the seed at startup and for every href discovered on a page.
/// The latter are always recovered locally by the fetch task.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Fragment-only reference")]
    FragmentOnly,

    #[error("Empty URL")]
    Empty,
}

/// Result type alias for Skein operations
pub type Result<T> = std::result::Result<T, SkeinError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlRun, CrawlStats, Crawler};
pub use url::{normalize_url, resolve_link};
