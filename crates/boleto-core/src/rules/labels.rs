//! Label-anchored value lookup and block slicing.

use lazy_static::lazy_static;
use regex::Regex;

use crate::text::{FoldedLine, contains_any, normalize_for_match, normalize_space};

lazy_static! {
    static ref TRAILING_ID: Regex = Regex::new(r"(?i)\s*[-–|]?\s*\b(?:cpf|cnpj)\b.*$").unwrap();
}

/// Lines that make up a labeled block of the document.
const BLOCK_LINES: usize = 6;

/// Value for the first line containing any of `labels`: the text after the
/// label on the same line, or the following line when that is empty or
/// hits `skip_terms`.
pub fn find_labeled_value(lines: &[&str], labels: &[&str], skip_terms: &[&str]) -> Option<String> {
    let folded: Vec<FoldedLine<'_>> = lines.iter().map(|l| FoldedLine::new(l)).collect();

    for (idx, line) in folded.iter().enumerate() {
        for label in labels {
            let Some(rest) = line.after(label) else {
                continue;
            };
            let value = rest.trim_matches(|c: char| c == ' ' || c == ':' || c == '-' || c == '\t');
            if !value.is_empty() && !contains_any(&normalize_for_match(value), skip_terms) {
                return Some(normalize_space(value));
            }
            if let Some(next) = lines.get(idx + 1) {
                let candidate = normalize_space(next);
                if !candidate.is_empty() && !contains_any(&normalize_for_match(&candidate), skip_terms) {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

/// Index of the first line whose folded form contains any of `labels`.
pub fn first_label_line(lines: &[&str], labels: &[&str]) -> Option<usize> {
    lines.iter().position(|line| {
        let folded = normalize_for_match(line);
        labels.iter().any(|label| folded.contains(label))
    })
}

/// The block of lines starting at the first line carrying one of `labels`,
/// ending early at a later line carrying one of `stop_labels`.
pub fn labeled_block(lines: &[&str], labels: &[&str], stop_labels: &[&str]) -> Option<String> {
    let start = first_label_line(lines, labels)?;
    let limit = (start + BLOCK_LINES).min(lines.len());
    let end = first_label_line(&lines[start + 1..limit], stop_labels).map_or(limit, |idx| start + 1 + idx);
    Some(lines[start..end].join("\n"))
}

/// Drop a trailing "- CPF: ..." / "CNPJ ..." tail from a name value.
pub fn strip_trailing_ids(value: &str) -> String {
    TRAILING_ID.replace(value, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_line_value() {
        let lines = ["Pagador: Maria da Silva", "Rua A, 10"];
        assert_eq!(
            find_labeled_value(&lines, &["pagador"], &[]),
            Some("Maria da Silva".to_string())
        );
    }

    #[test]
    fn test_next_line_value() {
        let lines = ["Beneficiário", "ACME   Comercio Ltda"];
        assert_eq!(
            find_labeled_value(&lines, &["beneficiario"], &[]),
            Some("ACME Comercio Ltda".to_string())
        );
    }

    #[test]
    fn test_skip_terms() {
        let lines = ["Endereco: Vencimento 10/05", "Rua das Flores, 100"];
        assert_eq!(
            find_labeled_value(&lines, &["endereco"], &["vencimento"]),
            Some("Rua das Flores, 100".to_string())
        );
    }

    #[test]
    fn test_labeled_block() {
        let lines = ["Banco", "Pagador: X", "Rua Y, 1", "Cidade"];
        assert_eq!(
            labeled_block(&lines, &["pagador"], &[]),
            Some("Pagador: X\nRua Y, 1\nCidade".to_string())
        );
        assert_eq!(labeled_block(&lines, &["sacado"], &[]), None);
    }

    #[test]
    fn test_labeled_block_stops_at_next_section() {
        let lines = ["Beneficiário: ACME", "CNPJ 11.222.333/0001-81", "Pagador: X", "CPF 1"];
        assert_eq!(
            labeled_block(&lines, &["beneficiario"], &["pagador"]),
            Some("Beneficiário: ACME\nCNPJ 11.222.333/0001-81".to_string())
        );
    }

    #[test]
    fn test_strip_trailing_ids() {
        assert_eq!(strip_trailing_ids("MARIA SILVA - CPF: 529.982.247-25"), "MARIA SILVA");
        assert_eq!(strip_trailing_ids("ACME LTDA CNPJ 11.222.333/0001-81"), "ACME LTDA");
        assert_eq!(strip_trailing_ids("JOAO"), "JOAO");
    }
}
