//! Rejection of implausible keyword values.

use crate::models::ValueType;
use crate::rules::amounts::parse_br_amount;
use crate::rules::dates::parse_br_date;
use crate::text::{compact_alphanumeric, digit_count, letter_count, normalize_for_match};

/// Length difference still treated as an echo of a phrase.
const NEAR_EQUAL_SLACK: usize = 2;
const MIN_ID_LEN: usize = 4;
const MIN_TEXT_LETTERS: usize = 3;

/// Whether `value` is noise for a keyword of type `value_type`.
///
/// `phrases` are the keyword's anchors and the stop phrases, already in
/// normalized form. A value that equals or nearly equals any of them is
/// noise for every type.
pub fn is_noise_value<S: AsRef<str>>(value: &str, value_type: ValueType, phrases: &[S]) -> bool {
    let folded = normalize_for_match(value);
    let folded = folded.trim_matches(|c: char| c == ':' || c == '-' || c == ' ' || c == '.');
    if folded.is_empty() {
        return true;
    }
    if phrases.iter().any(|p| near_equal(folded, p.as_ref())) {
        return true;
    }

    match value_type {
        ValueType::Text | ValueType::Address => {
            if parse_br_amount(value).is_some() || parse_br_date(value).is_some() {
                return true;
            }
            let letters = letter_count(value);
            letters < MIN_TEXT_LETTERS || digit_count(value) >= letters
        }
        ValueType::Id => compact_alphanumeric(value).chars().count() < MIN_ID_LEN,
        _ => false,
    }
}

fn near_equal(value: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    if value == phrase {
        return true;
    }
    let (short, long) = if value.len() <= phrase.len() {
        (value, phrase)
    } else {
        (phrase, value)
    };
    long.starts_with(short) && long.len() - short.len() <= NEAR_EQUAL_SLACK
}
