//! Single-attempt HTTP transport

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::request::{PageRequest, RawResponse};
use async_trait::async_trait;

/// Performs one HTTP attempt against the document API
///
/// Retry and classification live in `ApiClient`; a transport only reports
/// what the server said, or why it could not be reached.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one page request
    async fn post(&self, request: &PageRequest) -> Result<RawResponse, ClientError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('?').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// The request as it goes on the wire, key in the query string
    fn build(&self, request: &PageRequest) -> Result<reqwest::Request, ClientError> {
        Ok(self
            .client
            .post(&self.endpoint)
            .query(&[("api_key", self.api_key.as_str())])
            .json(request)
            .build()?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &PageRequest) -> Result<RawResponse, ClientError> {
        let response = self.client.execute(self.build(request)?).await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
