//! Payment line (linha digitavel) and barcode detection.
//!
//! A bank-slip prints its payment reference twice: as a 47-digit (bank) or
//! 48-digit (utility/tax) grouped payment line, and as a 44-digit barcode.

use super::patterns::{DIGIT_RUN, PAYMENT_LINE_47, PAYMENT_LINE_48};
use crate::text::only_digits;

/// Payment references found in a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentReferences {
    /// First 47/48-digit candidate.
    pub payment_line: Option<String>,
    /// First 44-digit candidate.
    pub barcode: Option<String>,
}

impl PaymentReferences {
    /// The reference reported as the `barcode` field: the payment line
    /// when present, otherwise the raw barcode.
    pub fn preferred(&self) -> Option<&str> {
        self.payment_line.as_deref().or(self.barcode.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.payment_line.is_none() && self.barcode.is_none()
    }
}

/// All payment reference candidates in discovery order, deduplicated.
///
/// Grouped 47-digit lines come first, then grouped 48-digit lines, then
/// 44-48 digit runs found line by line.
pub fn payment_candidates(text: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |digits: String| {
        if !candidates.contains(&digits) {
            candidates.push(digits);
        }
    };

    for caps in PAYMENT_LINE_47.captures_iter(text) {
        let digits: String = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
        if digits.len() == 47 {
            push(digits);
        }
    }

    for caps in PAYMENT_LINE_48.captures_iter(text) {
        let digits: String = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
        if digits.len() == 48 {
            push(digits);
        }
    }

    for line in text.lines() {
        for m in DIGIT_RUN.find_iter(line) {
            let digits = only_digits(m.as_str());
            if matches!(digits.len(), 44 | 47 | 48) {
                push(digits);
            }
        }
    }

    candidates
}

/// Pick the first 47/48-digit candidate as payment line and the first
/// 44-digit candidate as barcode.
pub fn select_references(candidates: &[String]) -> PaymentReferences {
    PaymentReferences {
        payment_line: candidates
            .iter()
            .find(|c| matches!(c.len(), 47 | 48))
            .cloned(),
        barcode: candidates.iter().find(|c| c.len() == 44).cloned(),
    }
}

/// Scan `text` for payment references.
pub fn extract_payment_references(text: &str) -> PaymentReferences {
    select_references(&payment_candidates(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_47: &str = "23790.12345 60000.123456 78901.234567 1 96780000150000";
    const BARCODE_44: &str = "23791967800001500001234560000123457890123456";

    #[test]
    fn test_payment_line_and_barcode_kept_apart() {
        let text = format!("Linha digitavel\n{LINE_47}\nCodigo de barras\n{BARCODE_44}\n");
        let refs = extract_payment_references(&text);

        assert_eq!(
            refs.payment_line.as_deref(),
            Some("23790123456000012345678901234567196780000150000")
        );
        assert_eq!(refs.barcode.as_deref(), Some(BARCODE_44));
        assert_eq!(refs.preferred(), refs.payment_line.as_deref());
    }

    #[test]
    fn test_grouped_48_digit_line() {
        let text = "836200000011 234500010004 567890123456 789012345678";
        let refs = extract_payment_references(text);
        assert_eq!(refs.payment_line.map(|l| l.len()), Some(48));
        assert_eq!(refs.barcode, None);
    }

    #[test]
    fn test_barcode_only() {
        let refs = extract_payment_references(BARCODE_44);
        assert_eq!(refs.payment_line, None);
        assert_eq!(refs.preferred(), Some(BARCODE_44));
    }

    #[test]
    fn test_short_runs_ignored() {
        let refs = extract_payment_references("Conta 1234567890 agencia 0001");
        assert!(refs.is_empty());
    }
}
