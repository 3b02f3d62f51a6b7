//! Per-type field layout

use harvest_domain::DocumentType;

/// Namespace and element names used to read one document type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// XML namespace every field must belong to
    pub namespace: &'static str,

    /// Issue timestamp element
    pub issued_at: &'static str,

    /// Issuer block containing the taxpayer element
    pub issuer: &'static str,

    /// Taxpayer element (direct child of the issuer block)
    pub taxpayer: &'static str,

    /// Document number element
    pub number: &'static str,

    /// Direction code element
    pub direction: &'static str,
}

const INVOICE: FieldSpec = FieldSpec {
    namespace: "http://www.portalfiscal.inf.br/nfe",
    issued_at: "dhEmi",
    issuer: "emit",
    taxpayer: "CNPJ",
    number: "nNF",
    direction: "tpNF",
};

const TRANSPORT: FieldSpec = FieldSpec {
    namespace: "http://www.portalfiscal.inf.br/cte",
    issued_at: "dhEmi",
    issuer: "emit",
    taxpayer: "CNPJ",
    number: "cCT",
    direction: "tpCTe",
};

impl FieldSpec {
    /// Field layout for a document type
    pub fn for_type(document_type: DocumentType) -> &'static FieldSpec {
        match document_type {
            DocumentType::Invoice => &INVOICE,
            DocumentType::Transport => &TRANSPORT,
        }
    }
}
