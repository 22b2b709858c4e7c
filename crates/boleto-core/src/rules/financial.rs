//! Core financial fields, resolved together in a single pass.

use super::amounts::{amount_by_context, format_amount, normalize_amount};
use super::barcode::{PaymentReferences, extract_payment_references};
use super::dates::normalize_date;
use super::patterns::{DOCUMENT_VALUE, DUE_DATE, INTEREST, ISSUE_DATE, PENALTY};
use regex::Regex;

/// Due date, issue date, value, payment reference, interest and penalty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreFields {
    pub due_date: Option<String>,
    pub issue_date: Option<String>,
    pub document_value: Option<String>,
    pub barcode: Option<String>,
    pub juros: Option<String>,
    pub multa: Option<String>,
    pub references: PaymentReferences,
}

/// Second capture group of the first match of `pattern`, converted by `f`.
fn labeled<F>(pattern: &Regex, text: &str, f: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    pattern
        .captures_iter(text)
        .find_map(|caps| caps.get(2).and_then(|m| f(m.as_str())))
}

/// Resolve every core field over `text`.
pub fn extract_core_fields(text: &str) -> CoreFields {
    let references = extract_payment_references(text);

    CoreFields {
        due_date: labeled(&DUE_DATE, text, normalize_date),
        issue_date: labeled(&ISSUE_DATE, text, normalize_date),
        document_value: labeled(&DOCUMENT_VALUE, text, normalize_amount)
            .or_else(|| amount_by_context(text).map(format_amount)),
        barcode: references.preferred().map(str::to_string),
        juros: labeled(&INTEREST, text, normalize_amount),
        multa: labeled(&PENALTY, text, normalize_amount),
        references,
    }
}
