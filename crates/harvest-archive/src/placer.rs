//! Path construction and create-or-overwrite writes

use crate::error::ArchiveError;
use crate::months::month_name;
use harvest_domain::DocumentMetadata;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a document ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Final file path
    pub path: PathBuf,

    /// Whether a file with different contents was overwritten
    pub replaced: bool,
}

/// Writes documents into the partitioned output tree
#[derive(Debug, Clone)]
pub struct FilePlacer {
    base_dir: PathBuf,
}

impl FilePlacer {
    /// Create a placer rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root of the output tree
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the output root if needed and check it is a directory
    ///
    /// Called once before a run; failure here is fatal for the whole run.
    pub fn ensure_root(&self) -> Result<(), ArchiveError> {
        fs::create_dir_all(&self.base_dir).map_err(|e| ArchiveError::Root {
            path: self.base_dir.clone(),
            reason: e.to_string(),
        })?;

        let meta = fs::metadata(&self.base_dir).map_err(|e| ArchiveError::Root {
            path: self.base_dir.clone(),
            reason: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(ArchiveError::Root {
                path: self.base_dir.clone(),
                reason: "not a directory".to_string(),
            });
        }
        if meta.permissions().readonly() {
            return Err(ArchiveError::Root {
                path: self.base_dir.clone(),
                reason: "directory is read-only".to_string(),
            });
        }
        Ok(())
    }

    /// Directory a document belongs in
    pub fn partition_dir(&self, metadata: &DocumentMetadata) -> PathBuf {
        self.base_dir
            .join(metadata.document_type.as_str())
            .join(metadata.direction.as_str())
            .join(sanitize(&metadata.year))
            .join(sanitize(month_name(&metadata.month)))
            .join(sanitize(&metadata.taxpayer_id))
    }

    /// Full path for a document
    ///
    /// `fallback_index` (1-based position within the page) names documents
    /// that carry no number.
    pub fn path_for(&self, metadata: &DocumentMetadata, fallback_index: usize) -> PathBuf {
        let stem = match metadata.document_number.as_deref() {
            Some(number) => sanitize(number),
            None => fallback_index.to_string(),
        };
        self.partition_dir(metadata).join(format!("{}.xml", stem))
    }

    /// Write a document, creating directories as needed
    ///
    /// An existing file at the computed path is overwritten. When its
    /// contents differ the overwrite is logged and reported through
    /// [`Placement::replaced`].
    pub fn place(
        &self,
        payload: &str,
        metadata: &DocumentMetadata,
        fallback_index: usize,
    ) -> Result<Placement, ArchiveError> {
        let dir = self.partition_dir(metadata);
        fs::create_dir_all(&dir).map_err(|source| ArchiveError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = self.path_for(metadata, fallback_index);

        let replaced = match fs::read(&path) {
            Ok(existing) if existing == payload.as_bytes() => false,
            Ok(_) => {
                tracing::warn!(
                    path = %path.display(),
                    "Overwriting existing document with different contents"
                );
                true
            }
            Err(_) => false,
        };

        fs::write(&path, payload).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Document written");
        Ok(Placement { path, replaced })
    }
}

/// Keep a metadata-derived path component inside its partition
fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}
