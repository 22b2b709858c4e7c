//! Full-text search helpers over extracted document text.

use std::collections::HashSet;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::{FoldedLine, normalize_for_match, normalize_space};

lazy_static! {
    static ref TERM_SEPARATOR: Regex = Regex::new(r"[,\s]+").unwrap();
}

/// Default snippet length in characters.
pub const SNIPPET_LEN: usize = 120;

/// How multiple terms combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    All,
    Any,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(MatchMode::All),
            "any" => Ok(MatchMode::Any),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

/// Split a raw query into normalized, deduplicated terms.
///
/// Queries containing `;` split on it only, so terms may contain spaces;
/// otherwise commas and whitespace separate terms.
pub fn split_terms(raw: &str) -> Vec<String> {
    let parts: Vec<&str> = if raw.contains(';') {
        raw.split(';').collect()
    } else {
        TERM_SEPARATOR.split(raw).collect()
    };

    let mut seen = HashSet::new();
    parts
        .into_iter()
        .map(normalize_for_match)
        .filter(|term| !term.is_empty() && seen.insert(term.clone()))
        .collect()
}

/// Whether `text` matches `terms` under `mode`. No terms matches
/// everything.
pub fn matches_terms(text: &str, terms: &[String], mode: MatchMode) -> bool {
    if terms.is_empty() {
        return true;
    }
    let folded = normalize_for_match(text);
    match mode {
        MatchMode::All => terms.iter().all(|term| folded.contains(term.as_str())),
        MatchMode::Any => terms.iter().any(|term| folded.contains(term.as_str())),
    }
}

/// Whether `text` contains none of `excluded`.
pub fn excludes_terms(text: &str, excluded: &[String]) -> bool {
    let folded = normalize_for_match(text);
    !excluded.iter().any(|term| folded.contains(term.as_str()))
}

/// Up to `max_len` characters of `text` around the earliest term hit,
/// with `...` marking cut ends. Empty when no term occurs.
pub fn build_snippet(text: &str, terms: &[String], max_len: usize) -> String {
    let normalized = normalize_space(text);
    let folded = FoldedLine::new(&normalized);

    let Some(hit) = terms
        .iter()
        .filter_map(|term| folded.find(term))
        .min_by_key(|range| range.start)
    else {
        return String::new();
    };

    let radius = (max_len / 2).max(1);
    let start = normalized[..hit.start]
        .char_indices()
        .rev()
        .nth(radius - 1)
        .map_or(0, |(idx, _)| idx);
    let end = normalized[hit.end..]
        .char_indices()
        .nth(radius)
        .map_or(normalized.len(), |(idx, _)| hit.end + idx);

    let mut snippet = normalized[start..end].trim().to_string();
    if start > 0 {
        snippet.insert_str(0, "...");
    }
    if end < normalized.len() {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn terms(raw: &str) -> Vec<String> {
        split_terms(raw)
    }

    #[test]
    fn test_split_terms() {
        assert_eq!(terms("Boleto, ENERGIA  boleto"), vec!["boleto", "energia"]);
        assert_eq!(terms("conta de luz; Água ;"), vec!["conta de luz", "agua"]);
        assert!(terms("  ").is_empty());
    }

    #[test]
    fn test_matches_terms() {
        let text = "Conta de Energia Elétrica\nVencimento 10/05/2024";
        assert!(matches_terms(text, &terms("energia eletrica"), MatchMode::All));
        assert!(!matches_terms(text, &terms("energia agua"), MatchMode::All));
        assert!(matches_terms(text, &terms("energia agua"), MatchMode::Any));
        assert!(matches_terms(text, &[], MatchMode::All));
        assert!(excludes_terms(text, &terms("agua")));
        assert!(!excludes_terms(text, &terms("vencimento")));
    }

    #[test]
    fn test_snippet_short_text() {
        let snippet = build_snippet("Pagamento   de Água", &terms("agua"), SNIPPET_LEN);
        assert_eq!(snippet, "Pagamento de Água");
    }

    #[test]
    fn test_snippet_window() {
        let text = format!("{} Vencimento 10/05 {}", "a".repeat(100), "b".repeat(100));
        let snippet = build_snippet(&text, &terms("vencimento"), 20);
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("Vencimento"));
        assert_eq!(snippet.trim_matches('.').chars().count(), 30);
    }

    #[test]
    fn test_snippet_no_hit() {
        assert_eq!(build_snippet("texto", &terms("boleto"), SNIPPET_LEN), "");
        assert_eq!(build_snippet("texto", &[], SNIPPET_LEN), "");
    }
}
