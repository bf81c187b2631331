//! Disclosure amount normalization.
//!
//! Congressional disclosure rows report transaction amounts as ranges
//! ("$1,001 - $15,000"), currency-formatted strings ("$50,000.00") or plain
//! numbers. The core expects one numeric value per row: ranges collapse to
//! their midpoint, currency symbols and thousands separators are stripped.

/// Parse a raw disclosure amount into a single numeric value.
///
/// Returns `None` when the cell is empty or carries no parsable number;
/// the row keeps a missing amount rather than being dropped.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    // Range separators: "1001 - 15000", "1001-15000", "1001 to 15000".
    let parts: Vec<f64> = split_range(cleaned)
        .into_iter()
        .filter_map(|part| parse_single(&part))
        .collect();

    match parts.as_slice() {
        [] => None,
        [single] => Some(*single),
        [low, high, ..] => Some((low + high) / 2.0),
    }
}

/// Split a cell on a range separator, if one is present.
fn split_range(cleaned: &str) -> Vec<String> {
    for separator in [" - ", " to ", "–"] {
        if cleaned.contains(separator) {
            return cleaned.split(separator).map(str::to_string).collect();
        }
    }

    // A bare hyphen is a range separator only between two numbers
    // ("100-200"); a leading hyphen marks a negative value.
    let inner_hyphen = cleaned
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-')
        .map(|(i, _)| i);
    if let Some(pos) = inner_hyphen {
        return vec![cleaned[..pos].to_string(), cleaned[pos + 1..].to_string()];
    }

    vec![cleaned.to_string()]
}

/// Parse one currency-formatted number.
fn parse_single(part: &str) -> Option<f64> {
    let digits: String = part
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse::<f64>().ok()
}
