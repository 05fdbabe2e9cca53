//! Configuration management for the residence admin client.
//!
//! Configuration is loaded once at startup from environment variables (and an
//! optional `.env` file) and then threaded explicitly into the HTTP client and
//! the customer view.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for the residence admin client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the residence REST API
    pub api_base_url: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Rows shown per page in tabular views (default: 5)
    pub items_per_page: usize,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `RESIDENCE_API_BASE_URL`: Base URL for the REST API
    ///
    /// Optional environment variables:
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `ITEMS_PER_PAGE`: Page size for paginated views (default: 5)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let api_base_url = env::var("RESIDENCE_API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("RESIDENCE_API_BASE_URL".to_string()))?;

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "RESIDENCE_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let items_per_page = Self::parse_env_usize("ITEMS_PER_PAGE", 5)?;

        if items_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                var: "ITEMS_PER_PAGE".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            api_base_url,
            request_timeout,
            items_per_page,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout: 10,
            items_per_page: 5,
            log_level: "info".to_string(),
        }
    }
}
