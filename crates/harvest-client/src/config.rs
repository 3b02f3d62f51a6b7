//! Configuration for the API client

use harvest_domain::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upstream endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.sieg.com/BaixarXmlsV2";

/// Connection and retry settings for the document API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint URL, without query string
    pub endpoint: String,

    /// API key, sent URL-encoded as the `api_key` query parameter
    pub api_key: String,

    /// Documents requested per page (upstream maximum: 50)
    pub page_size: usize,

    /// Attempts per page before the key is reported unavailable
    /// Default: 5
    pub max_retries: u32,

    /// Fixed delay between attempts (in seconds)
    /// Default: 5
    pub retry_delay_secs: u64,

    /// Per-request timeout (in seconds)
    /// Default: 60
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            max_retries: 5,
            retry_delay_secs: 5,
            request_timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    /// Get the retry delay as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("api.endpoint must not be empty".to_string());
        }
        if self.page_size == 0 || self.page_size > DEFAULT_PAGE_SIZE {
            return Err(format!(
                "api.page_size must be between 1 and {}",
                DEFAULT_PAGE_SIZE
            ));
        }
        if self.max_retries == 0 {
            return Err("api.max_retries must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("api.request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_page_size() {
        let mut config = ApiConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
        config.page_size = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_retries() {
        let config = ApiConfig {
            max_retries: 0,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ApiConfig = toml::from_str("api_key = \"abc\"\nmax_retries = 3").unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.page_size, 50);
    }
}
