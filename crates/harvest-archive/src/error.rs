//! Error types for the archive

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing documents to disk
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The output root could not be created or is not a directory
    #[error("Output root unusable: {path}: {reason}")]
    Root {
        /// Configured base directory
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A directory or file write failed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being created or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}
