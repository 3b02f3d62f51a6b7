//! Integration tests for harvest-store
//!
//! These tests exercise the ledger through the `DocumentStore` trait.

use harvest_domain::traits::DocumentStore;
use harvest_domain::{ContentHash, DocumentType};
use harvest_store::SqliteLedger;
use tempfile::TempDir;

const CNPJ: &str = "09240049000196";

#[test]
fn test_store_initialization() {
    let ledger = SqliteLedger::new(":memory:");
    assert!(ledger.is_ok(), "Ledger should initialize successfully");
    assert_eq!(ledger.unwrap().count().unwrap(), 0);
}

#[test]
fn test_record_and_exists() {
    let mut ledger = SqliteLedger::new(":memory:").unwrap();
    let hash = ContentHash::of("PG5mZVByb2M+PC9uZmVQcm9jPg==");

    assert!(!ledger.exists(hash.as_str()).unwrap());

    let inserted = ledger
        .record(hash.as_str(), CNPJ, DocumentType::Invoice, Some("1234"))
        .unwrap();
    assert!(inserted, "First insert should report true");
    assert!(ledger.exists(hash.as_str()).unwrap());

    let record = ledger.get(hash.as_str()).unwrap().expect("record should exist");
    assert_eq!(record.content_hash, hash.as_str());
    assert_eq!(record.taxpayer_id, CNPJ);
    assert_eq!(record.document_number.as_deref(), Some("1234"));
}

#[test]
fn test_duplicate_hash_is_noop() {
    let mut ledger = SqliteLedger::new(":memory:").unwrap();

    assert!(ledger.record("abc", CNPJ, DocumentType::Invoice, None).unwrap());
    assert!(
        !ledger.record("abc", CNPJ, DocumentType::Invoice, Some("99")).unwrap(),
        "Second insert with same hash should be a no-op"
    );
    assert_eq!(ledger.count().unwrap(), 1);

    // The original row is untouched
    let record = ledger.get("abc").unwrap().unwrap();
    assert_eq!(record.document_number, None);
}

#[test]
fn test_business_key_lookup() {
    let mut ledger = SqliteLedger::new(":memory:").unwrap();
    ledger
        .record("h1", CNPJ, DocumentType::Invoice, Some("1234"))
        .unwrap();

    assert!(ledger
        .exists_by_business_key(CNPJ, DocumentType::Invoice, Some("1234"))
        .unwrap());
    assert!(!ledger
        .exists_by_business_key(CNPJ, DocumentType::Invoice, Some("1235"))
        .unwrap());
    assert!(!ledger
        .exists_by_business_key("11222333000181", DocumentType::Invoice, Some("1234"))
        .unwrap());
    // Same number under the other document type is a different document
    assert!(!ledger
        .exists_by_business_key(CNPJ, DocumentType::Transport, Some("1234"))
        .unwrap());
}

#[test]
fn test_business_key_absent_number_is_never_a_match() {
    let mut ledger = SqliteLedger::new(":memory:").unwrap();
    ledger.record("h1", CNPJ, DocumentType::Invoice, None).unwrap();

    assert!(!ledger
        .exists_by_business_key(CNPJ, DocumentType::Invoice, None)
        .unwrap());
}

#[test]
fn test_business_key_conflict_is_noop() {
    let mut ledger = SqliteLedger::new(":memory:").unwrap();

    assert!(ledger
        .record("encoding-a", CNPJ, DocumentType::Invoice, Some("77"))
        .unwrap());
    assert!(
        !ledger
            .record("encoding-b", CNPJ, DocumentType::Invoice, Some("77"))
            .unwrap(),
        "Resubmission under a new encoding should not insert"
    );
    assert!(!ledger.exists("encoding-b").unwrap());
    assert_eq!(ledger.count().unwrap(), 1);
}

#[test]
fn test_documents_without_number_do_not_collide() {
    let mut ledger = SqliteLedger::new(":memory:").unwrap();

    assert!(ledger.record("h1", CNPJ, DocumentType::Invoice, None).unwrap());
    assert!(ledger.record("h2", CNPJ, DocumentType::Invoice, None).unwrap());
    assert_eq!(ledger.count().unwrap(), 2);
}

#[test]
fn test_ledger_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");

    {
        let mut ledger = SqliteLedger::new(&path).unwrap();
        ledger
            .record("persisted", CNPJ, DocumentType::Transport, Some("5"))
            .unwrap();
    }

    let ledger = SqliteLedger::new(&path).unwrap();
    assert!(ledger.exists("persisted").unwrap());
    assert!(ledger
        .exists_by_business_key(CNPJ, DocumentType::Transport, Some("5"))
        .unwrap());
}
