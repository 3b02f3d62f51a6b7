//! Harvest Ingest
//!
//! Orchestrates ingestion runs: for every taxpayer, day, and document type
//! it pages through the upstream API and pushes each payload through
//! dedup, decode, extraction, placement, and the ledger.
//!
//! # Overview
//!
//! ```text
//! for taxpayer in request (deduplicated, in order)
//!   for day in start..=end
//!     for type in request types
//!       loop: fetch page -> apply page -> pace -> next page if full
//! ```
//!
//! Per payload:
//!
//! 1. Skip if the content hash is already in the ledger
//! 2. Base64 and UTF-8 decode
//! 3. Extract partition metadata
//! 4. Skip if the (taxpayer, type, number) business key is already recorded
//! 5. Write the file
//! 6. Record in the ledger
//!
//! Per-document and per-key problems are logged and counted; only an
//! invalid request or configuration and an unusable output root abort a
//! run, and those are detected before the first fetch.
//!
//! # Progress
//!
//! The caller receives one [`ProgressEvent`] per key, with a
//! [`KeyOutcome`] and the number of documents written, and an
//! [`IngestSummary`] at the end.
//!
//! # Configuration
//!
//! ```toml
//! [api]
//! endpoint = "https://api.sieg.com/BaixarXmlsV2"
//! api_key = "..."
//! page_size = 50
//! max_retries = 5
//! retry_delay_secs = 5
//! request_timeout_secs = 60
//!
//! [output]
//! base_dir = "xmls"
//!
//! [ledger]
//! path = "harvest.db"
//! retention_days = 90
//!
//! [pacing]
//! page_delay_secs = 2
//! ```

#![warn(missing_docs)]

mod config;
mod decode;
mod error;
mod ingestor;
mod maintenance;
mod types;

pub use config::{IngestConfig, LedgerConfig, OutputConfig, PacingConfig};
pub use error::IngestError;
pub use ingestor::Ingestor;
pub use maintenance::{Maintenance, SweepReport};
pub use types::{IngestKey, IngestRequest, IngestSummary, KeyOutcome, ProgressEvent};
