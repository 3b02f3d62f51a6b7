//! Taxpayer list loading.

use crate::error::Result;
use harvest_domain::TaxpayerId;
use std::fs;
use std::path::Path;

/// Parsed taxpayer list.
#[derive(Debug, Default)]
pub struct TaxpayerList {
    /// Valid IDs, duplicates removed, in input order
    pub valid: Vec<TaxpayerId>,

    /// Raw entries that failed validation, with the reason
    pub rejected: Vec<(String, String)>,
}

/// Read raw entries from a file (one per line).
///
/// Blank lines and lines starting with `#` are ignored.
pub fn read_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Validate raw entries.
pub fn parse<I, S>(raw: I) -> TaxpayerList
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut list = TaxpayerList::default();
    for entry in raw {
        let entry = entry.as_ref();
        match TaxpayerId::parse(entry) {
            Ok(id) if !list.valid.contains(&id) => list.valid.push(id),
            Ok(_) => {}
            Err(reason) => list.rejected.push((entry.to_string(), reason)),
        }
    }
    list
}
