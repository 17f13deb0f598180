//! Ticker normalization — bare user input to the provider's qualified symbol.

/// Suffix Yahoo Finance uses for the Indonesia Stock Exchange.
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".JK";

/// Trim and upper-case `raw`, then append `suffix` exactly once.
///
/// No existence check is done here; an unknown symbol shows up downstream
/// as an empty series.
pub fn normalize(raw: &str, suffix: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    let suffix = suffix.trim().to_uppercase();
    if suffix.is_empty() || symbol.ends_with(&suffix) {
        symbol
    } else {
        format!("{symbol}{suffix}")
    }
}

/// Strip the exchange suffix back off for display and file names.
pub fn bare_symbol<'a>(qualified: &'a str, suffix: &str) -> &'a str {
    let suffix_len = suffix.trim().len();
    if suffix_len > 0
        && qualified.len() >= suffix_len
        && qualified[qualified.len() - suffix_len..].eq_ignore_ascii_case(suffix.trim())
    {
        &qualified[..qualified.len() - suffix_len]
    } else {
        qualified
    }
}
