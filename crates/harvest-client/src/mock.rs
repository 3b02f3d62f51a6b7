//! Mock document source for testing
//!
//! Serves scripted documents from memory so the ingestion pipeline can be
//! exercised without network access.

use crate::error::ClientError;
use async_trait::async_trait;
use chrono::NaiveDate;
use harvest_domain::traits::DocumentSource;
use harvest_domain::{DocumentType, FetchOutcome, FetchPage, PageQuery, TaxpayerId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Key = (String, NaiveDate, DocumentType);

#[derive(Debug, Clone)]
enum Failure {
    Unavailable { attempts: u32, reason: String },
    Invalid(String),
}

#[derive(Debug, Default)]
struct State {
    documents: HashMap<Key, Vec<String>>,
    failures: HashMap<Key, Failure>,
    calls: Vec<PageQuery>,
}

/// In-memory [`DocumentSource`]
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// inspecting calls after moving the source into an ingestor.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    state: Arc<Mutex<State>>,
}

fn key(taxpayer_id: &TaxpayerId, date: NaiveDate, document_type: DocumentType) -> Key {
    (taxpayer_id.as_str().to_string(), date, document_type)
}

impl MockSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Append encoded payloads for a key
    pub fn add_documents<I, S>(
        &self,
        taxpayer_id: &TaxpayerId,
        date: NaiveDate,
        document_type: DocumentType,
        payloads: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .documents
            .entry(key(taxpayer_id, date, document_type))
            .or_default()
            .extend(payloads.into_iter().map(Into::into));
    }

    /// Make every fetch for a key report exhausted retries
    pub fn fail_with_unavailable(
        &self,
        taxpayer_id: &TaxpayerId,
        date: NaiveDate,
        document_type: DocumentType,
        attempts: u32,
    ) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.failures.insert(
            key(taxpayer_id, date, document_type),
            Failure::Unavailable {
                attempts,
                reason: "HTTP 503: Service Unavailable".to_string(),
            },
        );
    }

    /// Make every fetch for a key return an undecodable response
    pub fn fail_with_invalid(
        &self,
        taxpayer_id: &TaxpayerId,
        date: NaiveDate,
        document_type: DocumentType,
        reason: impl Into<String>,
    ) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.failures.insert(
            key(taxpayer_id, date, document_type),
            Failure::Invalid(reason.into()),
        );
    }

    /// Total number of fetch calls made
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).calls.len()
    }

    /// Fetch calls made for a key, in order
    pub fn calls_for(
        &self,
        taxpayer_id: &TaxpayerId,
        date: NaiveDate,
        document_type: DocumentType,
    ) -> Vec<PageQuery> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .iter()
            .filter(|q| {
                q.taxpayer_id == *taxpayer_id && q.date == date && q.document_type == document_type
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentSource for MockSource {
    type Error = ClientError;

    async fn fetch_page(&self, query: &PageQuery) -> Result<FetchOutcome, Self::Error> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(query.clone());

        let key = key(&query.taxpayer_id, query.date, query.document_type);
        if let Some(failure) = state.failures.get(&key) {
            return match failure.clone() {
                Failure::Unavailable { attempts, reason } => {
                    Ok(FetchOutcome::Unavailable { attempts, reason })
                }
                Failure::Invalid(reason) => Err(ClientError::InvalidResponse(reason)),
            };
        }

        let all = state.documents.get(&key).map(Vec::as_slice).unwrap_or(&[]);
        if query.skip >= all.len() {
            return Ok(FetchOutcome::Empty);
        }

        let end = (query.skip + query.page_size).min(all.len());
        Ok(FetchOutcome::Page(FetchPage {
            documents: all[query.skip..end].to_vec(),
            page_size: query.page_size,
            requested_skip: query.skip,
        }))
    }
}
