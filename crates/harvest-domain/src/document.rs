//! Document model - types, directions, derived metadata, and ledger records

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;

/// Category of fiscal document supported by the harvester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    /// Electronic invoice (NF-e)
    Invoice,

    /// Electronic transport document (CT-e)
    Transport,
}

impl DocumentType {
    /// Every supported type, in the order a run processes them
    pub const ALL: [DocumentType; 2] = [DocumentType::Invoice, DocumentType::Transport];

    /// Stable lowercase name, used for directory names and ledger rows
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Transport => "transport",
        }
    }

    /// Upstream `XmlType` code
    pub fn xml_type(&self) -> u8 {
        match self {
            DocumentType::Invoice => 1,
            DocumentType::Transport => 2,
        }
    }

    /// Human-readable label for logs
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "NF-e",
            DocumentType::Transport => "CT-e",
        }
    }

    /// Parse a document type from its name or upstream label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "invoice" | "nfe" | "nf-e" | "1" => Some(DocumentType::Invoice),
            "transport" | "cte" | "ct-e" | "2" => Some(DocumentType::Transport),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid document type: {}", s))
    }
}

/// Whether the document records goods/services entering or leaving the issuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Entry (`0` in the type-code field)
    Inbound,

    /// Exit (any other code)
    Outbound,
}

impl Direction {
    /// Map a type-code field value to a direction
    ///
    /// Only the exact code `0` is inbound; everything else, including an
    /// absent field, is outbound.
    ///
    /// # Examples
    ///
    /// ```
    /// use harvest_domain::Direction;
    ///
    /// assert_eq!(Direction::from_code(Some("0")), Direction::Inbound);
    /// assert_eq!(Direction::from_code(Some("1")), Direction::Outbound);
    /// assert_eq!(Direction::from_code(None), Direction::Outbound);
    /// ```
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("0") => Direction::Inbound,
            _ => Direction::Outbound,
        }
    }

    /// Stable lowercase name, used for directory names
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partition keys derived from a decoded document
///
/// Derived once per document and used only to compute its file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Four-digit issue year (`"0000"` when unknown)
    pub year: String,

    /// Two-digit issue month (`"00"` when unknown)
    pub month: String,

    /// Issuer CNPJ (fourteen zeros when unknown)
    pub taxpayer_id: String,

    /// Document number, if the document carries one
    pub document_number: Option<String>,

    /// Entry or exit
    pub direction: Direction,

    /// Invoice or transport
    pub document_type: DocumentType,
}

/// Entry in the dedup ledger
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    /// SHA-256 hex digest of the raw encoded payload (primary key)
    pub content_hash: String,

    /// Taxpayer the document was fetched for
    pub taxpayer_id: String,

    /// Invoice or transport
    pub document_type: DocumentType,

    /// Document number, when known
    pub document_number: Option<String>,

    /// When the document was written to disk
    pub processed_at: DateTime<Utc>,
}

/// Stable digest of a raw encoded payload
///
/// Computed over the payload exactly as received from the API (before base64
/// decoding), so the same upstream document maps to the same key on every
/// run and platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Compute the SHA-256 hex digest of a payload
    ///
    /// # Examples
    ///
    /// ```
    /// use harvest_domain::ContentHash;
    ///
    /// let a = ContentHash::of("PHhtbC8+");
    /// let b = ContentHash::of("PHhtbC8+");
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str().len(), 64);
    /// ```
    pub fn of(payload: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        ContentHash(hex::encode(hasher.finalize()))
    }

    /// Get the hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_codes() {
        assert_eq!(DocumentType::Invoice.xml_type(), 1);
        assert_eq!(DocumentType::Transport.xml_type(), 2);
        assert_eq!(DocumentType::Invoice.as_str(), "invoice");
        assert_eq!(DocumentType::Transport.as_str(), "transport");
    }

    #[test]
    fn test_document_type_parse() {
        assert_eq!(DocumentType::parse("NFe"), Some(DocumentType::Invoice));
        assert_eq!(DocumentType::parse("transport"), Some(DocumentType::Transport));
        assert_eq!(DocumentType::parse(" CT-e "), Some(DocumentType::Transport));
        assert_eq!(DocumentType::parse("nfse"), None);
        assert!("receipt".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_direction_mapping() {
        assert_eq!(Direction::from_code(Some("0")), Direction::Inbound);
        assert_eq!(Direction::from_code(Some(" 0 ")), Direction::Inbound);
        assert_eq!(Direction::from_code(Some("1")), Direction::Outbound);
        assert_eq!(Direction::from_code(Some("2")), Direction::Outbound);
        assert_eq!(Direction::from_code(None), Direction::Outbound);
    }

    #[test]
    fn test_content_hash_is_stable_hex() {
        // SHA-256 of the empty string
        assert_eq!(
            ContentHash::of("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(ContentHash::of("a"), ContentHash::of("b"));
    }

    #[test]
    fn test_content_hash_distinguishes_encodings() {
        // Same decoded bytes, different encoded form
        assert_ne!(ContentHash::of("PHg+PC94Pg=="), ContentHash::of("PHg+PC94Pg==\n"));
    }
}
