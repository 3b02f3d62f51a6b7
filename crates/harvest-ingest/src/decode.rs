//! Payload decoding

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Decode a base64 payload into XML text
///
/// Surrounding whitespace is tolerated; the result must be valid UTF-8.
pub(crate) fn decode_payload(payload: &str) -> Result<String, String> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("base64 decode failed: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("payload is not UTF-8: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_standard_base64() {
        let encoded = STANDARD.encode("<nfeProc/>");
        assert_eq!(decode_payload(&encoded).unwrap(), "<nfeProc/>");
    }

    #[test]
    fn test_tolerates_surrounding_whitespace() {
        let encoded = format!("  {}\n", STANDARD.encode("<cteProc/>"));
        assert_eq!(decode_payload(&encoded).unwrap(), "<cteProc/>");
    }

    #[test]
    fn test_rejects_invalid_base64() {
        assert!(decode_payload("not base64 at all!").is_err());
    }

    #[test]
    fn test_rejects_non_utf8() {
        let encoded = STANDARD.encode([0xff, 0xfe, 0x00]);
        let err = decode_payload(&encoded).unwrap_err();
        assert!(err.contains("UTF-8"));
    }
}
