//! Month directory names

const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Marco", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// Directory name for a two-digit month code
///
/// Codes outside `01`..=`12` (including the `00` placeholder) are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use harvest_archive::month_name;
///
/// assert_eq!(month_name("02"), "Fevereiro");
/// assert_eq!(month_name("00"), "00");
/// ```
pub fn month_name(code: &str) -> &str {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return code;
    }
    match code.parse::<usize>() {
        Ok(n @ 1..=12) => MONTH_NAMES[n - 1],
        _ => code,
    }
}
