//! Harvest API Client
//!
//! Paginated access to the upstream fiscal document API.
//!
//! # Architecture
//!
//! This crate implements the `DocumentSource` trait from `harvest-domain`.
//! A [`Transport`] performs single HTTP attempts; [`ApiClient`] classifies
//! each response and applies a fixed-delay retry policy on top.
//!
//! | Response | Outcome |
//! |----------|---------|
//! | 200 with payloads | `FetchOutcome::Page` |
//! | 404 "Nenhum arquivo XML localizado" | `FetchOutcome::Empty` |
//! | any other status, network error | retried, then `FetchOutcome::Unavailable` |
//! | 200 with an undecodable body | `Err(ClientError::InvalidResponse)` |
//!
//! # Sources
//!
//! - `ApiClient<HttpTransport>`: the real API over reqwest
//! - `MockSource`: scripted in-memory documents for testing
//!
//! # Examples
//!
//! ```no_run
//! use harvest_client::{ApiClient, ApiConfig};
//! use harvest_domain::traits::DocumentSource;
//! use harvest_domain::{DocumentType, PageQuery, TaxpayerId};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig { api_key: "secret".into(), ..ApiConfig::default() };
//! let client = ApiClient::new(&config)?;
//!
//! let query = PageQuery::first(
//!     TaxpayerId::parse("09240049000196")?,
//!     NaiveDate::from_ymd_opt(2025, 2, 25).unwrap(),
//!     DocumentType::Invoice,
//!     config.page_size,
//! );
//! let outcome = client.fetch_page(&query).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classify;
mod client;
mod config;
mod error;
pub mod mock;
mod request;
mod transport;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ClientError;
pub use mock::MockSource;
pub use request::{PageRequest, RawResponse};
pub use transport::{HttpTransport, Transport};
