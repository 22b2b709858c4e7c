//! Unicode folding and whitespace helpers shared by every matcher.
//!
//! All label/anchor comparisons in the crate go through
//! [`normalize_for_match`]: NFKD decomposition, combining marks removed,
//! lowercase, whitespace runs collapsed to a single space.

use std::ops::Range;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a single character into its matching form, appending to `out`.
fn push_folded(ch: char, out: &mut String) {
    match ch {
        '°' | 'º' => out.push('o'),
        'ª' => out.push('a'),
        _ => {
            for decomposed in std::iter::once(ch).nfkd() {
                if is_combining_mark(decomposed) {
                    continue;
                }
                for lower in decomposed.to_lowercase() {
                    if !is_combining_mark(lower) {
                        out.push(lower);
                    }
                }
            }
        }
    }
}

/// Case/accent-insensitive form of `value` used for all comparisons.
///
/// Deterministic and idempotent.
pub fn normalize_for_match(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for ch in value.chars() {
        push_folded(ch, &mut folded);
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace runs into single spaces and trim.
pub fn normalize_space(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only ASCII digits.
pub fn only_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keep only alphanumeric characters.
pub fn compact_alphanumeric(value: &str) -> String {
    value.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Trimmed, non-empty lines of `text`.
pub fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether any of `terms` occurs in `haystack`.
pub fn contains_any<S: AsRef<str>>(haystack: &str, terms: &[S]) -> bool {
    terms.iter().any(|term| haystack.contains(term.as_ref()))
}

/// Number of alphabetic characters.
pub fn letter_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_alphabetic()).count()
}

/// Number of decimal digits.
pub fn digit_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Word count used as the text quality signal.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A line folded for matching that remembers where each folded byte came
/// from, so matches can be mapped back onto the original text.
#[derive(Debug, Clone)]
pub struct FoldedLine<'a> {
    original: &'a str,
    folded: String,
    origins: Vec<usize>,
}

impl<'a> FoldedLine<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut origins = Vec::with_capacity(original.len());
        let mut last_space = true;

        for (idx, ch) in original.char_indices() {
            if ch.is_whitespace() {
                if !last_space {
                    folded.push(' ');
                    origins.push(idx);
                    last_space = true;
                }
                continue;
            }
            let before = folded.len();
            push_folded(ch, &mut folded);
            origins.extend(std::iter::repeat_n(idx, folded.len() - before));
            if folded.len() > before {
                last_space = false;
            }
        }

        Self {
            original,
            folded,
            origins,
        }
    }

    /// The folded form.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// The original line.
    pub fn original(&self) -> &'a str {
        self.original
    }

    /// Whether the normalized `needle` occurs in this line.
    pub fn contains(&self, needle: &str) -> bool {
        !needle.is_empty() && self.folded.contains(needle)
    }

    /// Byte range in the original line of the first occurrence of the
    /// normalized `needle`.
    pub fn find(&self, needle: &str) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        let pos = self.folded.find(needle)?;
        Some(self.original_range(pos..pos + needle.len()))
    }

    /// Map a byte range of the folded form onto the original line.
    pub fn original_range(&self, folded: Range<usize>) -> Range<usize> {
        let start = self
            .origins
            .get(folded.start)
            .copied()
            .unwrap_or(self.original.len());
        let end = self
            .origins
            .get(folded.end)
            .copied()
            .unwrap_or(self.original.len());
        start..end.max(start)
    }

    /// Original text covered by a byte range of the folded form.
    pub fn original_slice(&self, folded: Range<usize>) -> &'a str {
        let range = self.original_range(folded);
        self.original[range].trim_end()
    }

    /// Original text following the first occurrence of `needle`.
    pub fn after(&self, needle: &str) -> Option<&'a str> {
        self.find(needle).map(|range| &self.original[range.end..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(normalize_for_match("  Número   do\tDocumento "), "numero do documento");
        assert_eq!(normalize_for_match("AVENIDA São João, Nº 10"), "avenida sao joao, no 10");
        assert_eq!(normalize_for_match("Instruções\n\nJuros"), "instrucoes juros");
        assert_eq!(normalize_for_match(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Vencimento: 10/05/2024",
            "AÇÃO ÉPICA  ÏÕ",
            "İstanbul ſ ﬁ ㎆",
            "Beneficiário\u{00a0}Fulano",
            "ºª° 1.234,56",
            "\t\n mixed   CASE ",
        ];
        for sample in samples {
            let once = normalize_for_match(sample);
            assert_eq!(normalize_for_match(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_folded_line_maps_back_to_original() {
        let line = FoldedLine::new("Beneficiário:  ACME Ltda");
        assert!(line.contains("beneficiario"));
        assert_eq!(line.after("beneficiario"), Some(":  ACME Ltda"));

        let line = FoldedLine::new("Nosso   Número 123");
        assert_eq!(line.after("nosso numero"), Some(" 123"));
        assert_eq!(line.find("inexistente"), None);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(only_digits("123.456.789-09"), "12345678909");
        assert_eq!(normalize_space("  a   b \t c "), "a b c");
        assert_eq!(non_empty_lines("a\n\n  b  \n"), vec!["a", "b"]);
        assert_eq!(word_count("um dois  tres\nquatro"), 4);
        assert_eq!(compact_alphanumeric("AB-12/3"), "AB123");
    }
}
