//! Wire types for the document API

use harvest_domain::PageQuery;
use serde::Serialize;

/// JSON body of a page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// 1 = NF-e, 2 = CT-e
    #[serde(rename = "XmlType")]
    pub xml_type: u8,

    /// Page size
    #[serde(rename = "Take")]
    pub take: usize,

    /// Offset
    #[serde(rename = "Skip")]
    pub skip: usize,

    /// First issue date (`YYYY-MM-DD`)
    #[serde(rename = "DataEmissaoInicio")]
    pub issued_from: String,

    /// Last issue date (`YYYY-MM-DD`)
    #[serde(rename = "DataEmissaoFim")]
    pub issued_to: String,

    /// Issuer CNPJ
    #[serde(rename = "CnpjEmit")]
    pub issuer_cnpj: String,

    /// Whether to include event documents (always false)
    #[serde(rename = "Downloadevent")]
    pub download_events: bool,
}

impl PageRequest {
    /// Build the request body for a single-day page query
    pub fn from_query(query: &PageQuery) -> Self {
        let day = query.date.format("%Y-%m-%d").to_string();
        Self {
            xml_type: query.document_type.xml_type(),
            take: query.page_size,
            skip: query.skip,
            issued_from: day.clone(),
            issued_to: day,
            issuer_cnpj: query.taxpayer_id.as_str().to_string(),
            download_events: false,
        }
    }
}

/// Status and body of one HTTP attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Convenience constructor
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use harvest_domain::{DocumentType, TaxpayerId};

    #[test]
    fn test_request_body_matches_wire_format() {
        let query = PageQuery {
            taxpayer_id: TaxpayerId::parse("09240049000196").unwrap(),
            date: NaiveDate::from_ymd_opt(2025, 2, 25).unwrap(),
            document_type: DocumentType::Transport,
            skip: 100,
            page_size: 50,
        };

        let body = serde_json::to_value(PageRequest::from_query(&query)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "XmlType": 2,
                "Take": 50,
                "Skip": 100,
                "DataEmissaoInicio": "2025-02-25",
                "DataEmissaoFim": "2025-02-25",
                "CnpjEmit": "09240049000196",
                "Downloadevent": false
            })
        );
    }
}
