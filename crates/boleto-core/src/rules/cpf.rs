//! CPF (Brazilian individual taxpayer number) extraction and validation.

use super::patterns::CPF_PATTERN;
use super::FieldExtractor;
use crate::text::only_digits;

/// CPF field extractor. Only candidates with valid check digits are
/// returned, as bare digits, in text order without repeats.
pub struct CpfExtractor;

impl FieldExtractor for CpfExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in CPF_PATTERN.find_iter(text) {
            let digits = only_digits(m.as_str());
            if results.contains(&digits) {
                continue;
            }
            if validate_cpf(&digits) {
                results.push(digits);
            }
        }

        results
    }
}

/// Extract the first valid CPF from text, formatted as `000.000.000-00`.
pub fn extract_cpf(text: &str) -> Option<String> {
    CpfExtractor.extract(text).map(|digits| format_cpf(&digits))
}

/// Validate a CPF using its two modulo-11 check digits.
///
/// Weights descend from 10 (first check digit) and 11 (second); a
/// remainder below 2 maps to check digit 0. Repeated-digit sequences are
/// rejected even though their arithmetic passes.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    (9..11).all(|position| {
        let sum: u32 = digits
            .iter()
            .take(position)
            .enumerate()
            .map(|(i, d)| d * (position as u32 + 1 - i as u32))
            .sum();
        let remainder = sum % 11;
        let check = if remainder < 2 { 0 } else { 11 - remainder };
        check == digits[position]
    })
}

/// Format CPF as `000.000.000-00`.
pub fn format_cpf(cpf: &str) -> String {
    let digits = only_digits(cpf);

    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
