//! Core ingestion loop

use crate::config::IngestConfig;
use crate::decode::decode_payload;
use crate::error::IngestError;
use crate::types::{IngestKey, IngestRequest, IngestSummary, KeyOutcome, ProgressEvent};
use harvest_archive::FilePlacer;
use harvest_domain::traits::{DocumentSource, DocumentStore};
use harvest_domain::{ContentHash, DocumentType, FetchOutcome, PageQuery, TaxpayerId};
use harvest_extractor::extract;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What happened to one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentResult {
    Saved { replaced: bool },
    Duplicate,
    Failed,
}

/// Running counts for the key being paginated
#[derive(Debug, Default)]
struct KeyTally {
    pages: usize,
    documents_seen: usize,
    saved: usize,
    duplicates: usize,
    failures: usize,
    replaced: usize,
}

impl KeyTally {
    fn count(&mut self, result: DocumentResult) {
        match result {
            DocumentResult::Saved { replaced } => {
                self.saved += 1;
                if replaced {
                    self.replaced += 1;
                }
            }
            DocumentResult::Duplicate => self.duplicates += 1,
            DocumentResult::Failed => self.failures += 1,
        }
    }

    fn finish(&self) -> KeyOutcome {
        if self.documents_seen == 0 {
            KeyOutcome::NoDocuments
        } else {
            KeyOutcome::Completed {
                pages: self.pages,
                documents_seen: self.documents_seen,
                duplicates: self.duplicates,
                failures: self.failures,
                replaced: self.replaced,
            }
        }
    }
}

/// Drives the taxpayer/day/type loop
///
/// Composes a [`DocumentSource`], a [`DocumentStore`], the extractor, and a
/// [`FilePlacer`]. Everything runs sequentially: one fetch outstanding at a
/// time, one document processed at a time. The ingestor owns the store, so
/// its `&mut self` writes are never shared.
///
/// # Examples
///
/// ```no_run
/// use harvest_archive::FilePlacer;
/// use harvest_client::MockSource;
/// use harvest_domain::TaxpayerId;
/// use harvest_ingest::{IngestConfig, IngestRequest, Ingestor};
/// use harvest_store::SqliteLedger;
/// use chrono::NaiveDate;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IngestConfig::default();
/// let store = SqliteLedger::new(&config.ledger.path)?;
/// let placer = FilePlacer::new(&config.output.base_dir);
/// let mut ingestor = Ingestor::new(config, MockSource::new(), store, placer);
///
/// let day = NaiveDate::from_ymd_opt(2025, 2, 25).unwrap();
/// let request = IngestRequest::new(vec![TaxpayerId::parse("09240049000196")?], day, day);
/// let summary = ingestor
///     .ingest(request, |event| println!("{}: {}", event.key, event.outcome))
///     .await?;
/// println!("{} saved", summary.documents_saved);
/// # Ok(())
/// # }
/// ```
pub struct Ingestor<S, D> {
    config: IngestConfig,
    source: S,
    store: D,
    placer: FilePlacer,
    cancel: Arc<AtomicBool>,
}

impl<S, D> Ingestor<S, D>
where
    S: DocumentSource,
    D: DocumentStore,
    D::Error: std::fmt::Display,
{
    /// Create a new Ingestor
    pub fn new(config: IngestConfig, source: S, store: D, placer: FilePlacer) -> Self {
        Self {
            config,
            source,
            store,
            placer,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for requesting cancellation
    ///
    /// Setting the flag stops the run before the next key starts. A key
    /// already in progress runs to completion.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The ledger
    pub fn store(&self) -> &D {
        &self.store
    }

    /// Mutable access to the ledger
    pub fn store_mut(&mut self) -> &mut D {
        &mut self.store
    }

    /// Run ingestion for every key in the request
    ///
    /// `on_event` is called once per key, in processing order. Only an
    /// invalid request or configuration and an unusable output root return
    /// `Err`, and both are detected before the first fetch.
    pub async fn ingest<F>(
        &mut self,
        request: IngestRequest,
        mut on_event: F,
    ) -> Result<IngestSummary, IngestError>
    where
        F: FnMut(&ProgressEvent),
    {
        self.config.validate().map_err(IngestError::Config)?;
        let keys = plan_keys(&request)?;
        self.placer.ensure_root()?;

        info!(
            keys = keys.len(),
            start = %request.start,
            end = %request.end,
            output = %self.placer.base_dir().display(),
            "Starting ingestion"
        );

        let mut summary = IngestSummary::default();
        for key in keys {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(next_key = %key, "Ingestion cancelled");
                summary.cancelled = true;
                break;
            }

            let event = self.process_key(key).await;
            if event.outcome.is_warning() {
                warn!(key = %event.key, outcome = %event.outcome, "Key finished with warning");
            } else {
                info!(
                    key = %event.key,
                    saved = event.documents_saved,
                    outcome = %event.outcome,
                    "Key finished"
                );
            }

            summary.absorb(&event);
            on_event(&event);
        }

        info!(
            keys = summary.keys_processed,
            saved = summary.documents_saved,
            duplicates = summary.duplicates,
            failures = summary.failures,
            unavailable = summary.unavailable_keys,
            cancelled = summary.cancelled,
            "Ingestion finished"
        );
        Ok(summary)
    }

    /// Paginate one key to its end
    async fn process_key(&mut self, key: IngestKey) -> ProgressEvent {
        let mut query = PageQuery::first(
            key.taxpayer_id.clone(),
            key.date,
            key.document_type,
            self.config.api.page_size,
        );
        let mut tally = KeyTally::default();

        let outcome = loop {
            let fetched = self.source.fetch_page(&query).await;
            tally.pages += 1;

            let step = match fetched {
                Ok(FetchOutcome::Page(page)) => {
                    debug!(key = %key, skip = query.skip, count = page.len(), "Applying page");
                    tally.documents_seen += page.len();
                    for (idx, payload) in page.documents.iter().enumerate() {
                        let result = self.process_document(&key, payload, idx + 1);
                        tally.count(result);
                    }

                    if page.is_terminal() {
                        Some(tally.finish())
                    } else {
                        None
                    }
                }
                Ok(FetchOutcome::Empty) => Some(tally.finish()),
                Ok(FetchOutcome::Unavailable { attempts, reason }) => {
                    Some(KeyOutcome::Unavailable { attempts, reason })
                }
                Err(e) => Some(KeyOutcome::DecodeFailed {
                    reason: e.to_string(),
                }),
            };

            // Every fetched page is followed by the delay, the last one included
            self.pace().await;
            match step {
                Some(outcome) => break outcome,
                None => query = query.next_page(),
            }
        };

        ProgressEvent {
            key,
            outcome,
            documents_saved: tally.saved,
            duplicates: tally.duplicates,
            failures: tally.failures,
            replaced: tally.replaced,
        }
    }

    /// Dedup, decode, extract, place, and record a single payload
    fn process_document(&mut self, key: &IngestKey, payload: &str, index: usize) -> DocumentResult {
        let hash = ContentHash::of(payload);

        match self.store.exists(hash.as_str()) {
            Ok(true) => {
                debug!(hash = %hash, "Already recorded");
                return DocumentResult::Duplicate;
            }
            Ok(false) => {}
            Err(e) => {
                error!(hash = %hash, error = %e, "Ledger lookup failed");
                return DocumentResult::Failed;
            }
        }

        let xml = match decode_payload(payload) {
            Ok(xml) => xml,
            Err(reason) => {
                warn!(key = %key, index, hash = %hash, reason = %reason, "Skipping undecodable payload");
                return DocumentResult::Failed;
            }
        };

        let metadata = match extract(&xml, key.document_type) {
            Some(metadata) => metadata,
            None => {
                warn!(key = %key, index, hash = %hash, "Skipping document with malformed XML");
                return DocumentResult::Failed;
            }
        };

        let taxpayer = key.taxpayer_id.as_str();
        let number = metadata.document_number.as_deref();
        if number.is_some() {
            match self
                .store
                .exists_by_business_key(taxpayer, key.document_type, number)
            {
                Ok(true) => {
                    debug!(hash = %hash, number = ?number, "Already recorded under another encoding");
                    return DocumentResult::Duplicate;
                }
                Ok(false) => {}
                Err(e) => {
                    error!(hash = %hash, error = %e, "Ledger lookup failed");
                    return DocumentResult::Failed;
                }
            }
        }

        let placement = match self.placer.place(&xml, &metadata, index) {
            Ok(placement) => placement,
            Err(e) => {
                error!(key = %key, index, hash = %hash, error = %e, "Failed to write document");
                return DocumentResult::Failed;
            }
        };

        // The file is on disk from here on; a ledger miss only costs a re-fetch
        match self
            .store
            .record(hash.as_str(), taxpayer, key.document_type, number)
        {
            Ok(true) => {}
            Ok(false) => warn!(
                hash = %hash,
                path = %placement.path.display(),
                "Ledger already held this document"
            ),
            Err(e) => error!(
                hash = %hash,
                path = %placement.path.display(),
                error = %e,
                "Failed to record document"
            ),
        }

        DocumentResult::Saved {
            replaced: placement.replaced,
        }
    }

    async fn pace(&self) {
        let delay = self.config.pacing.page_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Validate a request and expand it into keys in processing order
fn plan_keys(request: &IngestRequest) -> Result<Vec<IngestKey>, IngestError> {
    if request.start > request.end {
        return Err(IngestError::InvalidRequest(format!(
            "start date {} is after end date {}",
            request.start, request.end
        )));
    }
    if request.taxpayer_ids.is_empty() {
        return Err(IngestError::InvalidRequest(
            "no taxpayer IDs given".to_string(),
        ));
    }
    if request.document_types.is_empty() {
        return Err(IngestError::InvalidRequest(
            "no document types given".to_string(),
        ));
    }

    let taxpayers: Vec<&TaxpayerId> = dedup(&request.taxpayer_ids);
    let types: Vec<DocumentType> = dedup(&request.document_types).into_iter().copied().collect();

    let mut keys = Vec::new();
    for taxpayer_id in taxpayers {
        for date in request.start.iter_days().take_while(|d| *d <= request.end) {
            for &document_type in &types {
                keys.push(IngestKey {
                    taxpayer_id: taxpayer_id.clone(),
                    date,
                    document_type,
                });
            }
        }
    }
    Ok(keys)
}

/// First occurrence wins, order preserved
fn dedup<T: PartialEq>(items: &[T]) -> Vec<&T> {
    let mut seen: Vec<&T> = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
