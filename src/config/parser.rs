use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use skein::config::load_config;
///
/// let config = load_config(Path::new("skein.toml")).unwrap();
/// println!("Seed: {}", config.crawler.seed_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Parses a duration string such as `100ms`, `10s`, `1.5s`, `2m` or `1h`
///
/// A unit is always required. Fractional values are rounded to the nearest
/// nanosecond.
///
/// # Examples
///
/// ```
/// use skein::config::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("100ms").unwrap(), Duration::from_millis(100));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let trimmed = input.trim();

    let unit_start = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| ConfigError::InvalidDuration(format!("missing unit in '{}'", input)))?;
    let (number, unit) = trimmed.split_at(unit_start);

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidDuration(format!("invalid number in '{}'", input)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidDuration(format!(
            "duration must be a non-negative number, got '{}'",
            input
        )));
    }

    let nanos_per_unit: f64 = match unit {
        "ms" => 1e6,
        "s" => 1e9,
        "m" => 60e9,
        "h" => 3600e9,
        other => {
            return Err(ConfigError::InvalidDuration(format!(
                "unknown unit '{}' in '{}' (expected ms, s, m or h)",
                other, input
            )))
        }
    };

    let nanos = (value * nanos_per_unit).round();
    if nanos > u64::MAX as f64 {
        return Err(ConfigError::InvalidDuration(format!(
            "duration '{}' is too large",
            input
        )));
    }

    Ok(Duration::from_nanos(nanos as u64))
}

/// Serde adapter for duration strings in the TOML file
pub(crate) fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}
