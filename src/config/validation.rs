use crate::config::types::{Config, CrawlerConfig, HttpConfig, UserAgentConfig};
use crate::url::normalize_url;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
pub(crate) fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    normalize_url(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
    })?;

    if config.rate.is_zero() {
        return Err(ConfigError::Validation(
            "rate must be greater than zero".to_string(),
        ));
    }

    if config.time_limit.is_zero() {
        return Err(ConfigError::Validation(
            "time_limit must be greater than zero".to_string(),
        ));
    }

    if config.concurrency_cap == Some(0) {
        return Err(ConfigError::Validation(
            "concurrency_cap must be >= 1 when set".to_string(),
        ));
    }

    if config.frontier_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "frontier_capacity must be >= 1, got {}",
            config.frontier_capacity
        )));
    }

    if config.discovered_buffer < 1 {
        return Err(ConfigError::Validation(format!(
            "discovered_buffer must be >= 1, got {}",
            config.discovered_buffer
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.request_timeout.is_zero() || config.connect_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "HTTP timeouts must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
