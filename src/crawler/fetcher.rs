//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification into network, timeout and status failures

use crate::config::Config;
use reqwest::Client;
use std::future::Future;
use thiserror::Error;
use url::Url;

/// Reasons a page could not be retrieved
///
/// None of these leave the fetch task that hit them; the crawl carries on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Classifies a transport error from the HTTP client
    pub fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Retrieves the body of a page
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use skein::config::Config;
/// use skein::crawler::build_http_client;
///
/// let config = Config::new("https://example.com/");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.http.request_timeout)
        .connect_timeout(config.http.connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    /// Issues a GET request and returns the body of a successful response
    ///
    /// Redirects are followed by the client. Any non-2xx status is reported
    /// as [`FetchError::Status`] and its body is not scanned.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = Config::new("https://example.com/");
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_http_fetcher_new() {
        let mut config = Config::new("https://example.com/");
        config.user_agent.contact_url = Some("https://example.com/bot".to_string());
        assert!(HttpFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            url: "http://example.test/missing".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 for http://example.test/missing");

        let err = FetchError::Timeout {
            url: "http://example.test/slow".to_string(),
        };
        assert_eq!(err.to_string(), "Request timeout for http://example.test/slow");
    }

    // Request behavior is covered against a mock server in the integration tests.
}
