//! CNPJ (Brazilian company registration number) extraction and validation.

use super::patterns::CNPJ_PATTERN;
use super::FieldExtractor;
use crate::text::only_digits;

const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// CNPJ field extractor. Only candidates with valid check digits are
/// returned, as bare digits, in text order without repeats.
pub struct CnpjExtractor;

impl FieldExtractor for CnpjExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in CNPJ_PATTERN.find_iter(text) {
            let digits = only_digits(m.as_str());
            if results.contains(&digits) {
                continue;
            }
            if validate_cnpj(&digits) {
                results.push(digits);
            }
        }

        results
    }
}

/// Extract the first valid CNPJ from text, formatted as `00.000.000/0000-00`.
pub fn extract_cnpj(text: &str) -> Option<String> {
    CnpjExtractor.extract(text).map(|digits| format_cnpj(&digits))
}

/// Validate a CNPJ using its two weighted modulo-11 check digits.
///
/// Repeated-digit sequences are rejected.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 14 {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..12], &FIRST_WEIGHTS) == digits[12]
        && check_digit(&digits[..13], &SECOND_WEIGHTS) == digits[13]
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights.iter()).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Format CNPJ as `00.000.000/0000-00`.
pub fn format_cnpj(cnpj: &str) -> String {
    let digits = only_digits(cnpj);

    if digits.len() != 14 {
        return cnpj.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}
