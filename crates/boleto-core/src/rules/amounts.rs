//! Amount extraction for Brazilian documents (`1.234,56`).

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_PATTERN;
use super::FieldExtractor;
use super::lexicon::AMOUNT_CONTEXT_TERMS;
use crate::text::normalize_for_match;

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Largest amount in `text`, if any.
    pub fn largest(&self, text: &str) -> Option<Decimal> {
        self.extract_all(text).into_iter().max()
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT_PATTERN
            .find_iter(text)
            .filter_map(|m| parse_br_amount(m.as_str()))
            .collect()
    }
}

/// Parse a Brazilian-formatted amount (e.g. "1.234,56", "R$ 10,00").
///
/// Dots are thousands separators, the comma is the decimal separator.
/// Returns `None` for anything that is not a plain amount.
pub fn parse_br_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    let trimmed = trimmed
        .strip_prefix("R$")
        .map(str::trim_start)
        .unwrap_or(trimmed);

    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        || trimmed.matches(',').count() > 1
        || !trimmed.starts_with(|c: char| c.is_ascii_digit())
    {
        return None;
    }

    let normalized = trimmed.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Canonical two-decimal string form ("1234.56").
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Parse and format in one step: "1.234,56" -> "1234.56".
pub fn normalize_amount(s: &str) -> Option<String> {
    parse_br_amount(s).map(format_amount)
}

/// Document value by context: the largest amount on any line mentioning
/// a value/total term; otherwise the largest amount anywhere.
///
/// When several amounts share a contextual line (subtotal and total, for
/// instance) the maximum wins, which is not always the payable value.
pub fn amount_by_context(text: &str) -> Option<Decimal> {
    let extractor = AmountExtractor::new();

    let contextual = text
        .lines()
        .filter(|line| {
            let folded = normalize_for_match(line);
            AMOUNT_CONTEXT_TERMS.iter().any(|term| folded.contains(term))
        })
        .filter_map(|line| extractor.largest(line))
        .max();

    contextual.or_else(|| extractor.largest(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_br_amount() {
        assert_eq!(normalize_amount("1.234,56"), Some("1234.56".to_string()));
        assert_eq!(normalize_amount("10,00"), Some("10.00".to_string()));
        assert_eq!(normalize_amount("R$ 45,90"), Some("45.90".to_string()));
        assert_eq!(normalize_amount("1500"), Some("1500.00".to_string()));
    }

    #[test]
    fn test_parse_br_amount_malformed() {
        assert_eq!(parse_br_amount(""), None);
        assert_eq!(parse_br_amount("abc"), None);
        assert_eq!(parse_br_amount("1,2,3"), None);
        assert_eq!(parse_br_amount(",50"), None);
        assert_eq!(parse_br_amount("12/05/2024"), None);
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let results = extractor.extract_all("Juros: 1,50 Total: 1.234,56");
        assert_eq!(results.len(), 2);
        assert_eq!(extractor.largest("Juros: 1,50 Total: 1.234,56"), parse_br_amount("1.234,56"));
    }

    #[test]
    fn test_amount_by_context_prefers_contextual_lines() {
        let text = "Referencia 9.999,99\nValor a pagar 120,00 subtotal 100,00";
        assert_eq!(amount_by_context(text).map(format_amount), Some("120.00".to_string()));

        let text = "sem contexto 15,00\noutro 30,00";
        assert_eq!(amount_by_context(text).map(format_amount), Some("30.00".to_string()));
        assert_eq!(amount_by_context("nada aqui"), None);
    }
}
