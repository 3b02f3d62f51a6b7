//! Taxpayer identifiers (CNPJ)

use std::fmt;

/// Number of digits in a CNPJ
pub const CNPJ_LEN: usize = 14;

/// A validated 14-digit taxpayer identifier
///
/// Parsing strips every non-digit character, so masked input such as
/// `09.240.049/0001-96` is accepted. Check digits are not verified; the
/// upstream API is the authority on whether a CNPJ exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxpayerId(String);

impl TaxpayerId {
    /// Parse a taxpayer ID, ignoring punctuation
    ///
    /// # Examples
    ///
    /// ```
    /// use harvest_domain::TaxpayerId;
    ///
    /// let id = TaxpayerId::parse("09.240.049/0001-96").unwrap();
    /// assert_eq!(id.as_str(), "09240049000196");
    /// assert!(TaxpayerId::parse("1234").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, String> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != CNPJ_LEN {
            return Err(format!(
                "Invalid taxpayer ID '{}': expected {} digits, found {}",
                input.trim(),
                CNPJ_LEN,
                digits.len()
            ));
        }
        Ok(Self(digits))
    }

    /// Get the 14-digit string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxpayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TaxpayerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
