//! Configuration module for Skein
//!
//! This module handles loading, parsing, and validating run configuration,
//! either from a TOML file or built in code from a seed URL.
//!
//! # Example
//!
//! ```no_run
//! use skein::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("skein.toml")).unwrap();
//! println!("Crawl will stop after {:?}", config.crawler.time_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, UserAgentConfig, DEFAULT_DISCOVERED_BUFFER,
    DEFAULT_FRONTIER_CAPACITY, DEFAULT_RATE, DEFAULT_TIME_LIMIT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, parse_duration};
pub use validation::validate;
pub(crate) use validation::validate_crawler_config;
