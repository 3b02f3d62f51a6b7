//! Retrying page fetcher

use crate::classify::{classify, Attempt};
use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::request::PageRequest;
use crate::transport::{HttpTransport, Transport};
use async_trait::async_trait;
use harvest_domain::traits::DocumentSource;
use harvest_domain::{FetchOutcome, FetchPage, PageQuery};
use std::time::Duration;
use tracing::{debug, warn};

/// Document API client with a fixed-delay retry policy
///
/// Each `fetch_page` call makes up to `max_retries` attempts. Non-2xx
/// statuses (other than the "no files" 404) and network errors are
/// retried after `retry_delay`; exhausting the attempts yields
/// `FetchOutcome::Unavailable` rather than an error. No state is kept
/// between calls.
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    max_retries: u32,
    retry_delay: Duration,
}

impl ApiClient<HttpTransport> {
    /// Create a client for the real API
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        config.validate().map_err(ClientError::Config)?;
        Ok(Self::with_transport(HttpTransport::new(config)?, config))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(transport: T, config: &ApiConfig) -> Self {
        Self {
            transport,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        }
    }

    /// Set the maximum number of attempts per page
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: Transport> DocumentSource for ApiClient<T> {
    type Error = ClientError;

    async fn fetch_page(&self, query: &PageQuery) -> Result<FetchOutcome, Self::Error> {
        let request = PageRequest::from_query(query);
        let mut last_reason = String::from("no attempts made");

        for attempt in 1..=self.max_retries {
            match self.transport.post(&request).await {
                Ok(response) => match classify(&response) {
                    Attempt::Page(documents) => {
                        debug!(
                            taxpayer = %query.taxpayer_id,
                            date = %query.date,
                            skip = query.skip,
                            count = documents.len(),
                            "Fetched page"
                        );
                        return Ok(FetchOutcome::Page(FetchPage {
                            documents,
                            page_size: query.page_size,
                            requested_skip: query.skip,
                        }));
                    }
                    Attempt::Empty => return Ok(FetchOutcome::Empty),
                    Attempt::Invalid(reason) => {
                        return Err(ClientError::InvalidResponse(reason));
                    }
                    Attempt::Retry(reason) => last_reason = reason,
                },
                Err(e) => last_reason = e.to_string(),
            }

            warn!(
                taxpayer = %query.taxpayer_id,
                date = %query.date,
                attempt,
                max_retries = self.max_retries,
                reason = %last_reason,
                "Fetch attempt failed"
            );

            if attempt < self.max_retries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Ok(FetchOutcome::Unavailable {
            attempts: self.max_retries,
            reason: last_reason,
        })
    }
}
