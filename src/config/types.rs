use crate::config::parser::deserialize_duration;
use serde::Deserialize;
use std::time::Duration;

/// Minimum interval between admitted fetches when none is configured
pub const DEFAULT_RATE: Duration = Duration::from_millis(100);

/// Total run duration when none is configured
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10);

/// Bounded frontier size when none is configured
pub const DEFAULT_FRONTIER_CAPACITY: usize = 10;

/// Discovered stream buffer; 1 keeps the consumer coupled to the dispatcher
pub const DEFAULT_DISCOVERED_BUFFER: usize = 1;

/// Main configuration structure for Skein
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Creates a configuration with defaults for everything but the seed
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig::new(seed_url),
            user_agent: UserAgentConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// Crawl run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute http(s) URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Minimum interval between admitted fetches
    #[serde(default = "default_rate", deserialize_with = "deserialize_duration")]
    pub rate: Duration,

    /// Total run duration after which the crawl stops
    #[serde(
        rename = "time-limit",
        default = "default_time_limit",
        deserialize_with = "deserialize_duration"
    )]
    pub time_limit: Duration,

    /// Maximum number of simultaneous fetches (unset means unbounded)
    #[serde(rename = "concurrency-cap", default)]
    pub concurrency_cap: Option<usize>,

    /// Capacity of the bounded frontier queue
    #[serde(rename = "frontier-capacity", default = "default_frontier_capacity")]
    pub frontier_capacity: usize,

    /// Capacity of the discovered stream
    #[serde(rename = "discovered-buffer", default = "default_discovered_buffer")]
    pub discovered_buffer: usize,
}

impl CrawlerConfig {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            rate: DEFAULT_RATE,
            time_limit: DEFAULT_TIME_LIMIT,
            concurrency_cap: None,
            frontier_capacity: DEFAULT_FRONTIER_CAPACITY,
            discovered_buffer: DEFAULT_DISCOVERED_BUFFER,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// HTTP client timeouts
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout
    #[serde(
        rename = "request-timeout",
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,

    /// TCP/TLS connect timeout
    #[serde(
        rename = "connect-timeout",
        default = "default_connect_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_rate() -> Duration {
    DEFAULT_RATE
}

fn default_time_limit() -> Duration {
    DEFAULT_TIME_LIMIT
}

fn default_frontier_capacity() -> usize {
    DEFAULT_FRONTIER_CAPACITY
}

fn default_discovered_buffer() -> usize {
    DEFAULT_DISCOVERED_BUFFER
}

fn default_crawler_name() -> String {
    "skein".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}
