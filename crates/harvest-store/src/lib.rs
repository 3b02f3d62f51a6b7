//! Harvest Storage Layer
//!
//! Implements the `DocumentStore` trait on SQLite. The ledger records which
//! documents have already been written to disk so repeated runs skip them.
//!
//! # Schema
//!
//! A single `document_records` table keyed by content hash, with a partial
//! unique index on `(taxpayer_id, document_type, document_number)` for rows
//! whose document number is known.
//!
//! # Examples
//!
//! ```no_run
//! use harvest_store::SqliteLedger;
//!
//! let ledger = SqliteLedger::new(":memory:").unwrap();
//! // Ledger is now ready for dedup checks
//! ```

#![warn(missing_docs)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use harvest_domain::traits::DocumentStore;
use harvest_domain::{DocumentRecord, DocumentType};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `DocumentStore`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// `SqliteLedger`, and writes go through `&mut self`.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Open (or create) a ledger at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use harvest_store::SqliteLedger;
    ///
    /// let ledger = SqliteLedger::new("harvest.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut ledger = Self { conn };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Record a document with an explicit processing timestamp
    ///
    /// Same semantics as `DocumentStore::record`; used when importing
    /// history and by retention tests.
    pub fn record_at(
        &mut self,
        content_hash: &str,
        taxpayer_id: &str,
        document_type: DocumentType,
        document_number: Option<&str>,
        processed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO document_records
                 (content_hash, taxpayer_id, document_type, document_number, processed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                content_hash,
                taxpayer_id,
                document_type.as_str(),
                document_number,
                processed_at.timestamp(),
            ],
        )?;

        Ok(inserted == 1)
    }

    /// Delete records processed strictly before `cutoff`
    pub fn purge_before(&mut self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM document_records WHERE processed_at < ?1",
            params![cutoff.timestamp()],
        )?;
        Ok(removed)
    }

    /// Number of records in the ledger
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM document_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Look up a record by content hash
    pub fn get(&self, content_hash: &str) -> Result<Option<DocumentRecord>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT content_hash, taxpayer_id, document_type, document_number, processed_at
                 FROM document_records WHERE content_hash = ?1",
                params![content_hash],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((content_hash, taxpayer_id, type_str, document_number, ts)) = row else {
            return Ok(None);
        };

        let document_type = DocumentType::parse(&type_str)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown document type: {}", type_str)))?;
        let processed_at = Utc
            .timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| StoreError::InvalidData(format!("Invalid timestamp: {}", ts)))?;

        Ok(Some(DocumentRecord {
            content_hash,
            taxpayer_id,
            document_type,
            document_number,
            processed_at,
        }))
    }
}

impl DocumentStore for SqliteLedger {
    type Error = StoreError;

    fn exists(&self, content_hash: &str) -> Result<bool, Self::Error> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM document_records WHERE content_hash = ?1",
                params![content_hash],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn exists_by_business_key(
        &self,
        taxpayer_id: &str,
        document_type: DocumentType,
        document_number: Option<&str>,
    ) -> Result<bool, Self::Error> {
        // Cannot dedup on an unknown key
        let Some(number) = document_number else {
            return Ok(false);
        };

        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM document_records
                 WHERE taxpayer_id = ?1 AND document_type = ?2 AND document_number = ?3",
                params![taxpayer_id, document_type.as_str(), number],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn record(
        &mut self,
        content_hash: &str,
        taxpayer_id: &str,
        document_type: DocumentType,
        document_number: Option<&str>,
    ) -> Result<bool, Self::Error> {
        self.record_at(content_hash, taxpayer_id, document_type, document_number, Utc::now())
    }

    fn purge_older_than(&mut self, days: u32) -> usize {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        match self.purge_before(cutoff) {
            Ok(removed) => {
                tracing::debug!(removed, days, "Purged ledger records");
                removed
            }
            Err(e) => {
                tracing::warn!(error = %e, days, "Ledger purge failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_at_preserves_timestamp() {
        let mut ledger = SqliteLedger::new(":memory:").unwrap();
        let at = Utc.with_ymd_and_hms(2025, 2, 25, 12, 0, 0).unwrap();

        assert!(ledger
            .record_at("h1", "09240049000196", DocumentType::Invoice, Some("1234"), at)
            .unwrap());

        let record = ledger.get("h1").unwrap().unwrap();
        assert_eq!(record.processed_at, at);
        assert_eq!(record.document_type, DocumentType::Invoice);
        assert_eq!(record.document_number.as_deref(), Some("1234"));
    }

    #[test]
    fn test_purge_older_than_removes_only_expired_rows() {
        let mut ledger = SqliteLedger::new(":memory:").unwrap();
        let now = Utc::now();

        ledger
            .record_at("old", "09240049000196", DocumentType::Invoice, None, now - Duration::days(120))
            .unwrap();
        ledger
            .record_at("edge", "09240049000196", DocumentType::Invoice, None, now - Duration::days(89))
            .unwrap();
        ledger
            .record_at("new", "09240049000196", DocumentType::Transport, None, now)
            .unwrap();

        assert_eq!(ledger.purge_older_than(90), 1);
        assert!(!ledger.exists("old").unwrap());
        assert!(ledger.exists("edge").unwrap());
        assert!(ledger.exists("new").unwrap());
        assert_eq!(ledger.count().unwrap(), 2);
    }

    #[test]
    fn test_purge_zero_days_clears_past_rows() {
        let mut ledger = SqliteLedger::new(":memory:").unwrap();
        ledger
            .record_at(
                "h1",
                "09240049000196",
                DocumentType::Invoice,
                None,
                Utc::now() - Duration::hours(1),
            )
            .unwrap();

        assert_eq!(ledger.purge_older_than(0), 1);
        assert_eq!(ledger.count().unwrap(), 0);
    }

    #[test]
    fn test_purge_fails_soft() {
        let mut ledger = SqliteLedger::new(":memory:").unwrap();
        ledger.conn.execute_batch("DROP TABLE document_records").unwrap();

        assert_eq!(ledger.purge_older_than(90), 0);
    }
}
