//! Harvest Archive
//!
//! Deterministic on-disk placement of fiscal documents.
//!
//! # Layout
//!
//! ```text
//! <base_dir>/<document_type>/<direction>/<year>/<month_name>/<taxpayer_id>/<number>.xml
//! ```
//!
//! `month_name` comes from a fixed Portuguese table (`02` -> `Fevereiro`).
//! Documents without a number are named after their 1-based position in
//! the page they arrived in.
//!
//! # Example Usage
//!
//! ```no_run
//! use harvest_archive::FilePlacer;
//! use harvest_domain::{Direction, DocumentMetadata, DocumentType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let placer = FilePlacer::new("xml_arquivos");
//! placer.ensure_root()?;
//!
//! let meta = DocumentMetadata {
//!     year: "2025".into(),
//!     month: "02".into(),
//!     taxpayer_id: "09240049000196".into(),
//!     document_number: Some("1234".into()),
//!     direction: Direction::Inbound,
//!     document_type: DocumentType::Invoice,
//! };
//! let placement = placer.place("<nfeProc/>", &meta, 1)?;
//! println!("saved to {}", placement.path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod months;
mod placer;

pub use error::ArchiveError;
pub use months::month_name;
pub use placer::{FilePlacer, Placement};
