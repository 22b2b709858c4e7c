//! Address extraction.

use super::labels::find_labeled_value;
use super::lexicon::{ADDRESS_BLACKLIST, ADDRESS_KEYWORDS, ADDRESS_LABELS};
use super::patterns::POSTAL_CODE;
use crate::text::{non_empty_lines, normalize_for_match, normalize_space};

/// Address from a labeled line, falling back to the first line that
/// mentions a street type and carries a number.
pub fn extract_address(text: &str) -> Option<String> {
    let lines = non_empty_lines(text);
    labeled_address(&lines).or_else(|| street_line(&lines))
}

/// Address from a labeled line only.
pub fn labeled_address(lines: &[&str]) -> Option<String> {
    find_labeled_value(lines, ADDRESS_LABELS, ADDRESS_BLACKLIST)
}

fn street_line(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find(|line| {
            let folded = format!("{} ", normalize_for_match(line));
            ADDRESS_KEYWORDS.iter().any(|k| folded.contains(k))
                && line.chars().any(|c| c.is_ascii_digit())
        })
        .map(|line| normalize_space(line))
}

/// First postal code (CEP) in `text`, formatted `00000-000`.
pub fn extract_postal_code(text: &str) -> Option<String> {
    POSTAL_CODE
        .captures(text)
        .map(|caps| format!("{}{}-{}", &caps[1], &caps[2], &caps[3]))
}
