//! Type-aware value extraction over a window of lines.

use crate::models::ValueType;
use crate::rules::FieldExtractor;
use crate::rules::amounts::{AmountExtractor, format_amount};
use crate::rules::address::extract_postal_code;
use crate::rules::barcode::extract_payment_references;
use crate::rules::cnpj::extract_cnpj;
use crate::rules::cpf::extract_cpf;
use crate::rules::dates::DateExtractor;
use crate::text::{compact_alphanumeric, normalize_space};

/// Longest line still taken as an all-caps section title.
const TITLE_MAX_CHARS: usize = 40;
const MIN_ID_LEN: usize = 4;

/// Candidate values for `value_type` within `segments`, best first.
///
/// Segments are in priority order; for the anchor line only the text
/// after the anchor is passed in.
pub fn candidates(value_type: ValueType, segments: &[&str]) -> Vec<String> {
    match value_type {
        ValueType::Money => AmountExtractor::new()
            .largest(&segments.join("\n"))
            .map(format_amount)
            .into_iter()
            .collect(),
        ValueType::Date => first_date(segments).into_iter().collect(),
        ValueType::Cpf => segments.iter().find_map(|s| extract_cpf(s)).into_iter().collect(),
        ValueType::Cnpj => segments.iter().find_map(|s| extract_cnpj(s)).into_iter().collect(),
        ValueType::Barcode => extract_payment_references(&segments.join("\n"))
            .preferred()
            .map(str::to_string)
            .into_iter()
            .collect(),
        ValueType::Postal => segments
            .iter()
            .find_map(|s| extract_postal_code(s))
            .into_iter()
            .collect(),
        ValueType::Id => longest_token(segments).into_iter().collect(),
        ValueType::Block => block(segments).into_iter().collect(),
        ValueType::Text | ValueType::Address => segments
            .iter()
            .map(|s| normalize_space(s.trim_start_matches([' ', ':', '-', '\t'])))
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

fn first_date(segments: &[&str]) -> Option<String> {
    let extractor = DateExtractor::new();
    segments.iter().find_map(|segment| {
        extractor
            .extract(segment)
            .map(|d| d.format("%Y-%m-%d").to_string())
    })
}

/// Longest alphanumeric token of at least four characters after
/// compaction. Tokens carrying digits win over plain words.
fn longest_token(segments: &[&str]) -> Option<String> {
    let tokens: Vec<&str> = segments
        .iter()
        .flat_map(|s| s.split_whitespace())
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| compact_alphanumeric(t).chars().count() >= MIN_ID_LEN)
        .collect();

    let longest = |with_digits: bool| {
        tokens
            .iter()
            .filter(|t| t.chars().any(|c| c.is_ascii_digit()) == with_digits)
            .fold(None::<&str>, |best, t| match best {
                Some(b) if compact_alphanumeric(b).len() >= compact_alphanumeric(t).len() => Some(b),
                _ => Some(t),
            })
    };

    longest(true).or_else(|| longest(false)).map(str::to_string)
}

/// Whether a line reads like the title of a new section.
pub fn looks_like_title(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    if line.ends_with(':') {
        return true;
    }
    line.chars().count() <= TITLE_MAX_CHARS
        && line.chars().any(char::is_alphabetic)
        && !line.chars().any(char::is_lowercase)
}

/// Lines up to the next section title, skipping a leading title.
fn block(segments: &[&str]) -> Option<String> {
    let mut lines = segments.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).peekable();
    if lines.peek().is_some_and(|first| looks_like_title(first)) {
        lines.next();
    }
    let collected: Vec<&str> = lines.take_while(|line| !looks_like_title(line)).collect();
    (!collected.is_empty()).then(|| collected.join("\n"))
}
