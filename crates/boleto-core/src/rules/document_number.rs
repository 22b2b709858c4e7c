//! Document number extraction (nosso numero, numero do documento, ...).

use regex::Regex;

use super::cnpj::validate_cnpj;
use super::cpf::validate_cpf;
use super::dates::parse_br_date;
use super::patterns::{DOCUMENT_NUMBER, DOCUMENT_NUMBER_LABELS};
use crate::text::{FoldedLine, only_digits};

/// Minimum digits a document number must carry.
const MIN_DIGITS: usize = 5;

/// Document number from the label-specific patterns, in order, then the
/// generic label pattern.
///
/// Patterns run over the whole folded text, so a label on its own line
/// picks up the value printed on the line below.
pub fn extract_document_number(text: &str) -> Option<String> {
    let folded = FoldedLine::new(text);

    DOCUMENT_NUMBER_LABELS
        .iter()
        .find_map(|pattern| first_candidate(&folded, pattern, 1))
        .or_else(|| first_candidate(&folded, &DOCUMENT_NUMBER, 2))
}

fn first_candidate(text: &FoldedLine<'_>, pattern: &Regex, group: usize) -> Option<String> {
    pattern.captures_iter(text.folded()).find_map(|caps| {
        let m = caps.get(group)?;
        let value = text
            .original_slice(m.range())
            .trim_end_matches(['.', '-', '/'])
            .to_string();
        is_document_number(&value).then_some(value)
    })
}

/// Whether `value` is acceptable as a document number: enough digits, not
/// a national registration number, not a date.
pub fn is_document_number(value: &str) -> bool {
    let digits = only_digits(value);
    if digits.len() < MIN_DIGITS {
        return false;
    }
    !(validate_cpf(&digits) || validate_cnpj(&digits) || parse_br_date(value).is_some())
}
