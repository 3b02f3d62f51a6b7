//! Pagination model for upstream fetches

use crate::{DocumentType, TaxpayerId};
use chrono::NaiveDate;

/// Maximum number of documents the upstream API returns per call
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Criteria for fetching one page
///
/// Each query covers a single calendar day: the upstream start and end dates
/// are both set to `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Issuer to fetch documents for
    pub taxpayer_id: TaxpayerId,

    /// Issue date
    pub date: NaiveDate,

    /// Invoice or transport
    pub document_type: DocumentType,

    /// Number of documents to skip
    pub skip: usize,

    /// Number of documents requested
    pub page_size: usize,
}

impl PageQuery {
    /// First page for a key
    pub fn first(
        taxpayer_id: TaxpayerId,
        date: NaiveDate,
        document_type: DocumentType,
        page_size: usize,
    ) -> Self {
        Self {
            taxpayer_id,
            date,
            document_type,
            skip: 0,
            page_size,
        }
    }

    /// The query for the page after this one
    pub fn next_page(&self) -> Self {
        Self {
            skip: self.skip + self.page_size,
            ..self.clone()
        }
    }
}

/// One bounded batch of encoded document payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPage {
    /// Base64 payloads in upstream order
    pub documents: Vec<String>,

    /// Page size that was requested
    pub page_size: usize,

    /// Skip offset that was requested
    pub requested_skip: usize,
}

impl FetchPage {
    /// Whether this is the last page for its key
    ///
    /// A page holding exactly `page_size` documents may be followed by more;
    /// anything shorter, including an empty page, ends pagination.
    ///
    /// # Examples
    ///
    /// ```
    /// use harvest_domain::FetchPage;
    ///
    /// let full = FetchPage { documents: vec!["a".into(); 50], page_size: 50, requested_skip: 0 };
    /// assert!(!full.is_terminal());
    ///
    /// let short = FetchPage { documents: vec!["a".into(); 7], page_size: 50, requested_skip: 50 };
    /// assert!(short.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        self.documents.len() != self.page_size
    }

    /// Number of documents in the page
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the page holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Result of fetching one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Documents were returned
    Page(FetchPage),

    /// Upstream reported that no documents match the criteria
    Empty,

    /// Every attempt failed with a transient error
    Unavailable {
        /// Attempts made before giving up
        attempts: u32,
        /// Description of the last failure
        reason: String,
    },
}
