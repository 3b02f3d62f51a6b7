//! Error types for ingestion runs

use harvest_archive::ArchiveError;
use thiserror::Error;

/// Errors that abort an ingestion run
///
/// Per-document and per-key problems never surface here; they are counted
/// in the run's events and summary instead.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The request itself is unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The output tree cannot be used
    #[error("Output error: {0}")]
    Output(#[from] ArchiveError),
}
