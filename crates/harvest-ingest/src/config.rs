//! Configuration for an ingestion run

use harvest_client::ApiConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Everything an [`Ingestor`](crate::Ingestor) needs to know
///
/// Passed explicitly at construction; nothing is read from global state.
///
/// # Examples
///
/// ```
/// use harvest_ingest::IngestConfig;
///
/// let config = IngestConfig::from_toml(r#"
///     [api]
///     api_key = "secret"
///
///     [pacing]
///     page_delay_secs = 1
/// "#).unwrap();
///
/// assert_eq!(config.api.page_size, 50);
/// assert_eq!(config.pacing.page_delay_secs, 1);
/// assert_eq!(config.ledger.retention_days, 90);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Upstream API connection and retry policy
    pub api: ApiConfig,

    /// Output tree
    pub output: OutputConfig,

    /// Dedup ledger
    pub ledger: LedgerConfig,

    /// Inter-request pacing
    pub pacing: PacingConfig,
}

/// Output tree settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root of the partitioned file tree
    pub base_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("xmls"),
        }
    }
}

/// Ledger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// SQLite database file
    pub path: PathBuf,

    /// Age (in days) after which ledger records are purged
    /// Default: 90
    pub retention_days: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("harvest.db"),
            retention_days: 90,
        }
    }
}

/// Pacing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay after every completed fetch call (in seconds)
    /// Default: 2
    pub page_delay_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { page_delay_secs: 2 }
    }
}

impl PacingConfig {
    /// Get the page delay as a Duration
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }
}

impl IngestConfig {
    /// Preset with every delay set to zero
    ///
    /// Retries and pacing still happen, they just do not wait. Intended for
    /// tests and local mock runs.
    pub fn without_delays() -> Self {
        let mut config = Self::default();
        config.api.retry_delay_secs = 0;
        config.pacing.page_delay_secs = 0;
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.api.validate()?;
        if self.output.base_dir.as_os_str().is_empty() {
            return Err("output.base_dir must not be empty".to_string());
        }
        if self.ledger.path.as_os_str().is_empty() {
            return Err("ledger.path must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pacing.page_delay(), Duration::from_secs(2));
        assert_eq!(config.ledger.retention_days, 90);
        assert_eq!(config.output.base_dir, PathBuf::from("xmls"));
    }

    #[test]
    fn test_without_delays_is_valid() {
        let config = IngestConfig::without_delays();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.retry_delay_secs, 0);
        assert_eq!(config.pacing.page_delay(), Duration::ZERO);
        assert_eq!(config.api.max_retries, 5);
    }

    #[test]
    fn test_invalid_page_size() {
        let mut config = IngestConfig::default();
        config.api.page_size = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_paths_rejected() {
        let mut config = IngestConfig::default();
        config.output.base_dir = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = IngestConfig::default();
        config.ledger.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = IngestConfig::from_toml("").unwrap();
        assert_eq!(config.api.max_retries, 5);
        assert_eq!(config.pacing.page_delay_secs, 2);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = IngestConfig::default();
        config.api.api_key = "abc".to_string();
        config.output.base_dir = PathBuf::from("/srv/xmls");

        let toml_str = config.to_toml().unwrap();
        let parsed = IngestConfig::from_toml(&toml_str).unwrap();

        assert_eq!(parsed.api.api_key, "abc");
        assert_eq!(parsed.output.base_dir, PathBuf::from("/srv/xmls"));
        assert_eq!(parsed.ledger.retention_days, config.ledger.retention_days);
    }

    #[test]
    fn test_malformed_toml() {
        assert!(IngestConfig::from_toml("[api\npage_size = ").is_err());
    }
}
