//! Configuration file handling for the CLI.

use crate::error::{CliError, Result};
use harvest_ingest::IngestConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default configuration file path.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".harvest").join("config.toml"))
}

/// Resolve the configuration path from an optional override.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_path(),
    }
}

/// Load configuration from file, falling back to defaults when absent.
///
/// A non-empty `api_key` override replaces the key from the file.
pub fn load(path: &Path, api_key: Option<&str>) -> Result<IngestConfig> {
    let mut config = if path.exists() {
        let contents = fs::read_to_string(path)?;
        toml::from_str::<IngestConfig>(&contents)?
    } else {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        IngestConfig::default()
    };

    if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
        config.api.api_key = key.to_string();
    }

    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

/// Write a default configuration file.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = IngestConfig::default()
        .to_toml()
        .map_err(CliError::Config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("absent.toml"), None).unwrap();
        assert_eq!(config.api.page_size, 50);
        assert!(config.api.api_key.is_empty());
    }

    #[test]
    fn test_api_key_override_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\napi_key = \"from-file\"\n").unwrap();

        let config = load(&path, None).unwrap();
        assert_eq!(config.api.api_key, "from-file");

        let config = load(&path, Some("from-env")).unwrap();
        assert_eq!(config.api.api_key, "from-env");

        let config = load(&path, Some("  ")).unwrap();
        assert_eq!(config.api.api_key, "from-file");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\npage_size = 500\n").unwrap();

        assert!(matches!(load(&path, None), Err(CliError::Config(_))));
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\n").unwrap();

        assert!(matches!(load(&path, None), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_write_default_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        write_default(&path, false).unwrap();
        let config = load(&path, None).unwrap();
        assert_eq!(config.ledger.retention_days, 90);

        assert!(write_default(&path, false).is_err());
        assert!(write_default(&path, true).is_ok());
    }
}
