//! Request, progress, and summary types for ingestion runs

use chrono::NaiveDate;
use harvest_domain::{DocumentType, TaxpayerId};
use std::fmt;

/// What to ingest
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Issuers to fetch, in processing order
    pub taxpayer_ids: Vec<TaxpayerId>,

    /// First issue date (inclusive)
    pub start: NaiveDate,

    /// Last issue date (inclusive)
    pub end: NaiveDate,

    /// Document types to fetch for each day, in processing order
    pub document_types: Vec<DocumentType>,
}

impl IngestRequest {
    /// Request covering both document types
    pub fn new(taxpayer_ids: Vec<TaxpayerId>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            taxpayer_ids,
            start,
            end,
            document_types: DocumentType::ALL.to_vec(),
        }
    }

    /// Restrict to the given document types
    pub fn with_document_types(mut self, document_types: Vec<DocumentType>) -> Self {
        self.document_types = document_types;
        self
    }
}

/// One unit of pagination: a taxpayer, a day, and a document type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngestKey {
    /// Issuer
    pub taxpayer_id: TaxpayerId,

    /// Issue date
    pub date: NaiveDate,

    /// Invoice or transport
    pub document_type: DocumentType,
}

impl fmt::Display for IngestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.taxpayer_id,
            self.date.format("%Y-%m-%d"),
            self.document_type.label()
        )
    }
}

/// How a key ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Pagination ran to a terminal page
    Completed {
        /// Fetch calls made
        pages: usize,
        /// Payloads received
        documents_seen: usize,
        /// Payloads skipped as already recorded
        duplicates: usize,
        /// Payloads skipped after a decode, extraction, or write failure
        failures: usize,
        /// Saved documents that overwrote a different file
        replaced: usize,
    },

    /// Upstream had nothing for this key
    NoDocuments,

    /// Retries were exhausted
    Unavailable {
        /// Attempts made on the failing page
        attempts: u32,
        /// Last failure
        reason: String,
    },

    /// Upstream answered with a body that could not be decoded
    DecodeFailed {
        /// Why decoding failed
        reason: String,
    },
}

impl KeyOutcome {
    /// Whether the outcome warrants a warning to the operator
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            KeyOutcome::Unavailable { .. } | KeyOutcome::DecodeFailed { .. }
        )
    }
}

impl fmt::Display for KeyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOutcome::Completed {
                pages,
                documents_seen,
                duplicates,
                failures,
                replaced,
            } => write!(
                f,
                "{} document(s) in {} page(s), {} duplicate(s), {} failure(s), {} replaced",
                documents_seen, pages, duplicates, failures, replaced
            ),
            KeyOutcome::NoDocuments => write!(f, "no documents"),
            KeyOutcome::Unavailable { attempts, reason } => {
                write!(f, "unavailable after {} attempt(s): {}", attempts, reason)
            }
            KeyOutcome::DecodeFailed { reason } => write!(f, "undecodable response: {}", reason),
        }
    }
}

/// Emitted once per key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// The key that finished
    pub key: IngestKey,

    /// How it finished
    pub outcome: KeyOutcome,

    /// Documents written for this key
    pub documents_saved: usize,

    /// Payloads skipped as already recorded, across every page fetched
    pub duplicates: usize,

    /// Payloads skipped after a failure, across every page fetched
    pub failures: usize,

    /// Saved documents that overwrote a different file
    pub replaced: usize,
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Keys that ran to an outcome
    pub keys_processed: usize,

    /// Documents written
    pub documents_saved: usize,

    /// Payloads skipped as already recorded
    pub duplicates: usize,

    /// Payloads skipped after a failure
    pub failures: usize,

    /// Saved documents that overwrote a different file
    pub replaced: usize,

    /// Keys that ended `Unavailable` or `DecodeFailed`
    pub unavailable_keys: usize,

    /// Whether the run stopped on the cancel flag
    pub cancelled: bool,
}

impl IngestSummary {
    pub(crate) fn absorb(&mut self, event: &ProgressEvent) {
        self.keys_processed += 1;
        self.documents_saved += event.documents_saved;
        // Pages applied before a failure still count
        self.duplicates += event.duplicates;
        self.failures += event.failures;
        self.replaced += event.replaced;
        if event.outcome.is_warning() {
            self.unavailable_keys += 1;
        }
    }
}
