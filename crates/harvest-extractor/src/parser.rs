//! Streaming field capture over fiscal XML

use crate::fields::FieldSpec;
use harvest_domain::{Direction, DocumentMetadata, DocumentType};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

/// Year used when the issue timestamp is missing
pub const UNKNOWN_YEAR: &str = "0000";

/// Month used when the issue timestamp is missing
pub const UNKNOWN_MONTH: &str = "00";

/// Taxpayer ID used when the issuer CNPJ is missing
pub const UNKNOWN_TAXPAYER: &str = "00000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    IssuedAt,
    Taxpayer,
    Number,
    Direction,
}

#[derive(Debug, Default)]
struct Captured {
    issued_at: Option<String>,
    taxpayer: Option<String>,
    number: Option<String>,
    direction: Option<String>,
}

impl Captured {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::IssuedAt => &mut self.issued_at,
            Field::Taxpayer => &mut self.taxpayer,
            Field::Number => &mut self.number,
            Field::Direction => &mut self.direction,
        }
    }

    fn is_captured(&mut self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    /// First occurrence in document order wins
    fn set_if_absent(&mut self, field: Field, value: String) {
        let slot = self.slot(field);
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

/// Extract partition metadata from a decoded document
///
/// Returns `None` when the markup is malformed, has no root element, or
/// carries an issue timestamp that does not start with `YYYY-MM-DD`.
/// Missing fields are defaulted: `0000`/`00` for the date, fourteen zeros
/// for the taxpayer, and `None` for the document number.
pub fn extract(xml: &str, document_type: DocumentType) -> Option<DocumentMetadata> {
    let spec = FieldSpec::for_type(document_type);

    let captured = match scan(xml, spec) {
        Ok(captured) => captured,
        Err(reason) => {
            tracing::debug!(%document_type, %reason, "Failed to parse document XML");
            return None;
        }
    };

    let (year, month) = match captured.issued_at.as_deref() {
        None => (UNKNOWN_YEAR.to_string(), UNKNOWN_MONTH.to_string()),
        Some(text) => match split_issue_date(text) {
            Some(parts) => parts,
            None => {
                tracing::debug!(%document_type, issued_at = text, "Unparseable issue timestamp");
                return None;
            }
        },
    };

    let taxpayer_id = non_empty(captured.taxpayer).unwrap_or_else(|| UNKNOWN_TAXPAYER.to_string());
    let document_number = non_empty(captured.number);
    let direction = Direction::from_code(captured.direction.as_deref());

    Some(DocumentMetadata {
        year,
        month,
        taxpayer_id,
        document_number,
        direction,
        document_type,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split the leading `YYYY-MM-DD` of an ISO timestamp into year and month
fn split_issue_date(text: &str) -> Option<(String, String)> {
    let date = text.trim().get(..10)?;
    let bytes = date.as_bytes();
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    Some((date[0..4].to_string(), date[5..7].to_string()))
}

fn classify(name: &[u8], parents: &[(Vec<u8>, bool)], spec: &FieldSpec) -> Option<Field> {
    if name == spec.issued_at.as_bytes() {
        Some(Field::IssuedAt)
    } else if name == spec.number.as_bytes() {
        Some(Field::Number)
    } else if name == spec.direction.as_bytes() {
        Some(Field::Direction)
    } else if name == spec.taxpayer.as_bytes() {
        match parents.last() {
            Some((parent, true)) if parent.as_slice() == spec.issuer.as_bytes() => {
                Some(Field::Taxpayer)
            }
            _ => None,
        }
    } else {
        None
    }
}

fn scan(xml: &str, spec: &FieldSpec) -> Result<Captured, String> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let target_ns = spec.namespace.as_bytes();
    let mut stack: Vec<(Vec<u8>, bool)> = Vec::new();
    // Field being read, depth of its element, text collected so far
    let mut active: Option<(Field, usize, String)> = None;
    let mut captured = Captured::default();
    let mut saw_root = false;

    loop {
        let (resolved, event) = reader.read_resolved_event().map_err(|e| e.to_string())?;
        let in_ns = matches!(resolved, ResolveResult::Bound(Namespace(ns)) if ns == target_ns);

        match event {
            Event::Start(e) => {
                saw_root = true;
                let name = e.local_name().as_ref().to_vec();
                if active.is_none() && in_ns {
                    if let Some(field) = classify(&name, &stack, spec) {
                        if !captured.is_captured(field) {
                            active = Some((field, stack.len(), String::new()));
                        }
                    }
                }
                stack.push((name, in_ns));
            }
            Event::Empty(e) => {
                saw_root = true;
                if in_ns {
                    if let Some(field) = classify(e.local_name().as_ref(), &stack, spec) {
                        captured.set_if_absent(field, String::new());
                    }
                }
            }
            Event::Text(t) => {
                if let Some((_, depth, buf)) = active.as_mut() {
                    if stack.len() == *depth + 1 {
                        buf.push_str(&t.unescape().map_err(|e| e.to_string())?);
                    }
                }
            }
            Event::CData(c) => {
                if let Some((_, depth, buf)) = active.as_mut() {
                    if stack.len() == *depth + 1 {
                        buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            Event::End(_) => {
                stack
                    .pop()
                    .ok_or_else(|| "unbalanced closing tag".to_string())?;
                if matches!(active, Some((_, depth, _)) if depth == stack.len()) {
                    if let Some((field, _, text)) = active.take() {
                        captured.set_if_absent(field, text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err("document has no root element".to_string());
    }
    if !stack.is_empty() {
        return Err(format!("unexpected end of document ({} open elements)", stack.len()));
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NFE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe35250209240049000196550010000012341000012345">
      <ide>
        <cUF>35</cUF>
        <nNF>1234</nNF>
        <dhEmi>2025-02-25T10:30:00-03:00</dhEmi>
        <tpNF>1</tpNF>
      </ide>
      <emit>
        <CNPJ>09240049000196</CNPJ>
        <xNome>Fornecedor &amp; Cia</xNome>
      </emit>
      <dest>
        <CNPJ>11222333000181</CNPJ>
      </dest>
    </infNFe>
  </NFe>
</nfeProc>"#;

    const CTE: &str = r#"<cteProc xmlns="http://www.portalfiscal.inf.br/cte">
  <CTe><infCte>
    <ide><cCT>00012345</cCT><nCT>88</nCT><tpCTe>0</tpCTe><dhEmi>2024-11-03T08:00:00-03:00</dhEmi></ide>
    <emit><CNPJ>11222333000181</CNPJ></emit>
  </infCte></CTe>
</cteProc>"#;

    #[test]
    fn test_extract_invoice() {
        let meta = extract(NFE, DocumentType::Invoice).unwrap();
        assert_eq!(meta.year, "2025");
        assert_eq!(meta.month, "02");
        assert_eq!(meta.taxpayer_id, "09240049000196");
        assert_eq!(meta.document_number.as_deref(), Some("1234"));
        assert_eq!(meta.direction, Direction::Outbound);
        assert_eq!(meta.document_type, DocumentType::Invoice);
    }

    #[test]
    fn test_extract_transport_uses_its_own_tags() {
        let meta = extract(CTE, DocumentType::Transport).unwrap();
        assert_eq!(meta.year, "2024");
        assert_eq!(meta.month, "11");
        assert_eq!(meta.taxpayer_id, "11222333000181");
        assert_eq!(meta.document_number.as_deref(), Some("00012345"));
        assert_eq!(meta.direction, Direction::Inbound);
    }

    #[test]
    fn test_fields_outside_namespace_are_ignored() {
        // Reading an NF-e with the CT-e layout finds nothing in the CT-e namespace
        let meta = extract(NFE, DocumentType::Transport).unwrap();
        assert_eq!(meta.year, UNKNOWN_YEAR);
        assert_eq!(meta.month, UNKNOWN_MONTH);
        assert_eq!(meta.taxpayer_id, UNKNOWN_TAXPAYER);
        assert_eq!(meta.document_number, None);
        assert_eq!(meta.direction, Direction::Outbound);
    }

    #[test]
    fn test_prefixed_namespace() {
        let xml = r#"<n:nfeProc xmlns:n="http://www.portalfiscal.inf.br/nfe">
            <n:ide><n:nNF>7</n:nNF><n:dhEmi>2023-01-05</n:dhEmi><n:tpNF>0</n:tpNF></n:ide>
            <n:emit><n:CNPJ>09240049000196</n:CNPJ></n:emit>
        </n:nfeProc>"#;
        let meta = extract(xml, DocumentType::Invoice).unwrap();
        assert_eq!(meta.document_number.as_deref(), Some("7"));
        assert_eq!(meta.year, "2023");
        assert_eq!(meta.month, "01");
        assert_eq!(meta.direction, Direction::Inbound);
    }

    #[test]
    fn test_only_issuer_cnpj_is_taxpayer() {
        let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
            <dest><CNPJ>11222333000181</CNPJ></dest>
            <emit><CNPJ>09240049000196</CNPJ></emit>
        </nfeProc>"#;
        let meta = extract(xml, DocumentType::Invoice).unwrap();
        assert_eq!(meta.taxpayer_id, "09240049000196");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><ide/></nfeProc>"#;
        let meta = extract(xml, DocumentType::Invoice).unwrap();
        assert_eq!(meta.year, "0000");
        assert_eq!(meta.month, "00");
        assert_eq!(meta.taxpayer_id, "00000000000000");
        assert_eq!(meta.document_number, None);
        assert_eq!(meta.direction, Direction::Outbound);
    }

    #[test]
    fn test_empty_number_element_is_absent() {
        let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
            <nNF/><dhEmi>2025-03-01T00:00:00Z</dhEmi>
        </nfeProc>"#;
        let meta = extract(xml, DocumentType::Invoice).unwrap();
        assert_eq!(meta.document_number, None);
        assert_eq!(meta.month, "03");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
            <nNF>1</nNF><nNF>2</nNF>
        </nfeProc>"#;
        let meta = extract(xml, DocumentType::Invoice).unwrap();
        assert_eq!(meta.document_number.as_deref(), Some("1"));
    }

    #[test]
    fn test_malformed_markup_returns_none() {
        assert!(extract("<nfeProc><nNF>1</nfeProc>", DocumentType::Invoice).is_none());
        assert!(extract("<nfeProc><nNF>1</nNF>", DocumentType::Invoice).is_none());
        assert!(extract("not xml at all", DocumentType::Invoice).is_none());
        assert!(extract("", DocumentType::Invoice).is_none());
    }

    #[test]
    fn test_bad_issue_date_returns_none() {
        let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
            <dhEmi>25/02/2025</dhEmi>
        </nfeProc>"#;
        assert!(extract(xml, DocumentType::Invoice).is_none());

        let short = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><dhEmi>2025</dhEmi></nfeProc>"#;
        assert!(extract(short, DocumentType::Invoice).is_none());
    }

    #[test]
    fn test_split_issue_date() {
        assert_eq!(
            split_issue_date("2025-02-25T10:30:00-03:00"),
            Some(("2025".to_string(), "02".to_string()))
        );
        assert_eq!(
            split_issue_date(" 2025-12-01 "),
            Some(("2025".to_string(), "12".to_string()))
        );
        assert_eq!(split_issue_date("2025-2-25"), None);
        assert_eq!(split_issue_date(""), None);
    }
}
