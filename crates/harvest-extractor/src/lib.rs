//! Harvest Extractor
//!
//! Derives partition keys from decoded fiscal XML documents.
//!
//! # Overview
//!
//! Each document type has its own namespace and field tags (see
//! [`FieldSpec`]). The extractor streams through the document once and
//! captures the first occurrence of each field:
//!
//! | Field | Invoice (NF-e) | Transport (CT-e) |
//! |-------|----------------|------------------|
//! | Issue timestamp | `dhEmi` | `dhEmi` |
//! | Issuer CNPJ | `emit/CNPJ` | `emit/CNPJ` |
//! | Number | `nNF` | `cCT` |
//! | Direction code | `tpNF` | `tpCTe` |
//!
//! Missing fields fall back to placeholders; malformed markup yields `None`
//! so the caller can skip the document without affecting the rest of its
//! page.
//!
//! # Example Usage
//!
//! ```
//! use harvest_domain::{Direction, DocumentType};
//! use harvest_extractor::extract;
//!
//! let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
//!   <NFe><infNFe>
//!     <ide><nNF>1234</nNF><dhEmi>2025-02-25T10:30:00-03:00</dhEmi><tpNF>0</tpNF></ide>
//!     <emit><CNPJ>09240049000196</CNPJ></emit>
//!   </infNFe></NFe>
//! </nfeProc>"#;
//!
//! let meta = extract(xml, DocumentType::Invoice).unwrap();
//! assert_eq!(meta.year, "2025");
//! assert_eq!(meta.month, "02");
//! assert_eq!(meta.document_number.as_deref(), Some("1234"));
//! assert_eq!(meta.direction, Direction::Inbound);
//! ```

#![warn(missing_docs)]

mod fields;
mod parser;

pub use fields::FieldSpec;
pub use parser::{extract, UNKNOWN_MONTH, UNKNOWN_TAXPAYER, UNKNOWN_YEAR};
