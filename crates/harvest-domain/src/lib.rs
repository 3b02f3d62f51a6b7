//! Harvest Domain Layer
//!
//! Core model and trait seams for the fiscal XML harvester. Infrastructure
//! crates (ledger, HTTP client, extractor, archive) implement or consume
//! the types defined here.
//!
//! ## Key Concepts
//!
//! - **Taxpayer ID**: a validated 14-digit CNPJ, the primary query and partition key
//! - **Document type**: invoice (NF-e) or transport document (CT-e)
//! - **Content hash**: SHA-256 of the raw encoded payload, the ledger primary key
//! - **Page**: one bounded batch of payloads returned by a single upstream fetch
//! - **Ledger**: the durable record of documents already written to disk

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod page;
pub mod taxpayer;
pub mod traits;

// Re-exports for convenience
pub use document::{ContentHash, Direction, DocumentMetadata, DocumentRecord, DocumentType};
pub use page::{FetchOutcome, FetchPage, PageQuery, DEFAULT_PAGE_SIZE};
pub use taxpayer::TaxpayerId;
