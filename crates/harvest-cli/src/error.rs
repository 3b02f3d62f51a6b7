//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Store(#[from] harvest_store::StoreError),

    /// API client error
    #[error("API client error: {0}")]
    Client(#[from] harvest_client::ClientError),

    /// Ingestion run aborted
    #[error("Ingestion failed: {0}")]
    Ingest(#[from] harvest_ingest::IngestError),
}
