//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the ingestion pipeline and
//! infrastructure. Implementations live in other crates.

use crate::{DocumentType, FetchOutcome, PageQuery};
use async_trait::async_trait;

/// Trait for the dedup ledger
///
/// Implemented by the infrastructure layer (harvest-store). Writes take
/// `&mut self`, which makes the owner of the store the single writer.
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Whether a document with this content hash has been recorded
    fn exists(&self, content_hash: &str) -> Result<bool, Self::Error>;

    /// Whether a document with this business key has been recorded
    ///
    /// Always `false` when `document_number` is `None`.
    fn exists_by_business_key(
        &self,
        taxpayer_id: &str,
        document_type: DocumentType,
        document_number: Option<&str>,
    ) -> Result<bool, Self::Error>;

    /// Record a written document
    ///
    /// Returns `true` on first insert and `false` (no-op) when the content
    /// hash or the business key is already present.
    fn record(
        &mut self,
        content_hash: &str,
        taxpayer_id: &str,
        document_type: DocumentType,
        document_number: Option<&str>,
    ) -> Result<bool, Self::Error>;

    /// Delete records processed more than `days` days ago
    ///
    /// Maintenance operation: failures are logged and reported as zero
    /// removals rather than returned.
    fn purge_older_than(&mut self, days: u32) -> usize;
}

/// Trait for the upstream document API
///
/// Implemented by the infrastructure layer (harvest-client).
#[async_trait]
pub trait DocumentSource {
    /// Error type for responses that cannot be decoded
    type Error: std::fmt::Display;

    /// Fetch a single page, retrying transient failures internally
    async fn fetch_page(&self, query: &PageQuery) -> Result<FetchOutcome, Self::Error>;
}
