//! Response classification

use crate::request::RawResponse;
use serde_json::Value;

/// Message the API returns (with a 404) when no document matches
pub(crate) const NO_FILES_MARKER: &str = "Nenhum arquivo XML localizado";

/// What a single attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Attempt {
    /// Encoded payloads, possibly none
    Page(Vec<String>),
    /// No documents for the criteria
    Empty,
    /// Transient failure worth another attempt
    Retry(String),
    /// Successful status with an undecodable body
    Invalid(String),
}

pub(crate) fn classify(response: &RawResponse) -> Attempt {
    match response.status {
        200 => match decode_documents(&response.body) {
            Ok(documents) => Attempt::Page(documents),
            Err(reason) => Attempt::Invalid(reason),
        },
        404 if is_no_files_response(&response.body) => Attempt::Empty,
        status => Attempt::Retry(format!("HTTP {}: {}", status, excerpt(&response.body))),
    }
}

/// A 404 body is a JSON array whose first string carries the marker
fn is_no_files_response(body: &str) -> bool {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items
            .first()
            .and_then(Value::as_str)
            .is_some_and(|first| first.contains(NO_FILES_MARKER)),
        _ => false,
    }
}

/// Pull payload strings out of a success body
///
/// Accepts `{"xmls": [...]}`, a bare array, or either of those encoded a
/// second time as a JSON string.
fn decode_documents(body: &str) -> Result<Vec<String>, String> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("JSON parse error: {}", e))?;

    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| format!("JSON parse error in string-encoded body: {}", e))?,
        other => other,
    };

    match value {
        Value::Array(items) => payload_strings(items),
        Value::Object(mut map) => match map.remove("xmls") {
            Some(Value::Array(items)) => payload_strings(items),
            _ => Ok(Vec::new()),
        },
        other => Err(format!("Unexpected response shape: {}", type_name(&other))),
    }
}

fn payload_strings(items: Vec<Value>) -> Result<Vec<String>, String> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(s) => Ok(s),
            other => Err(format!(
                "Payload {} is a {} rather than a string",
                idx + 1,
                type_name(&other)
            )),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
