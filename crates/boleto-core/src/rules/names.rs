//! Payee and payer name extraction.
//!
//! The payee name is resolved by an ordered list of strategies; the first
//! one producing a plausible name wins.

use super::labels::{find_labeled_value, strip_trailing_ids};
use super::lexicon::{NAME_BLACKLIST, PAYEE_LABELS, PAYEE_REGISTRATION_ANCHORS, PAYER_LABELS};
use super::patterns::{COMPANY_SUFFIX, KNOWN_COMPANY};
use crate::text::{
    FoldedLine, contains_any, digit_count, letter_count, non_empty_lines, normalize_for_match,
    normalize_space,
};

/// Lines searched forward/backward from an anchor line.
const OFFSET_LINES: usize = 3;

/// Whether `value` is plausible as a person or company name.
pub fn looks_like_name(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.chars().count() < 6 {
        return false;
    }
    if contains_any(&normalize_for_match(trimmed), NAME_BLACKLIST) {
        return false;
    }
    let letters = letter_count(trimmed);
    let digits = digit_count(trimmed);
    if letters < 3 {
        return false;
    }
    !(digits > 0 && digits >= letters)
}

/// Inputs shared by the payee strategies.
struct NameContext<'a> {
    lines: Vec<&'a str>,
    folded: Vec<String>,
    text: &'a str,
    known_payees: &'a [String],
}

type NameStrategy = fn(&NameContext<'_>) -> Option<String>;

/// Payee strategies in the order they are tried.
const PAYEE_STRATEGIES: &[(&str, NameStrategy)] = &[
    ("label", payee_by_label),
    ("offset", payee_by_offset),
    ("registration_anchor", payee_near_registration),
    ("known_company", payee_known_company_line),
    ("company_suffix", payee_by_company_suffix),
    ("known_payee_list", payee_from_known_list),
];

fn payee_by_label(ctx: &NameContext<'_>) -> Option<String> {
    for (idx, line) in ctx.lines.iter().enumerate() {
        let folded = FoldedLine::new(line);
        for label in PAYEE_LABELS {
            let Some(rest) = folded.after(label) else {
                continue;
            };
            let same_line = strip_trailing_ids(rest.trim_start_matches([' ', ':', '-', '\t']));
            if looks_like_name(&same_line) {
                return Some(normalize_space(&same_line));
            }
            let next_line = ctx.lines.get(idx + 1).map(|l| strip_trailing_ids(l));
            if let Some(next) = next_line.filter(|n| looks_like_name(n)) {
                return Some(normalize_space(&next));
            }
        }
    }
    None
}

fn payee_by_offset(ctx: &NameContext<'_>) -> Option<String> {
    ctx.folded
        .iter()
        .enumerate()
        .filter(|(_, line)| contains_any(line, PAYEE_LABELS))
        .find_map(|(idx, _)| {
            (1..=OFFSET_LINES)
                .filter_map(|offset| ctx.lines.get(idx + offset))
                .map(|line| strip_trailing_ids(&normalize_space(line)))
                .find(|candidate| looks_like_name(candidate))
        })
}

fn payee_near_registration(ctx: &NameContext<'_>) -> Option<String> {
    ctx.folded
        .iter()
        .enumerate()
        .filter(|(idx, line)| *idx > 0 && contains_any(line, PAYEE_REGISTRATION_ANCHORS))
        .find_map(|(idx, _)| {
            (1..=OFFSET_LINES.min(idx))
                .map(|back| normalize_space(ctx.lines[idx - back]))
                .find(|candidate| looks_like_name(candidate))
        })
}

fn payee_known_company_line(ctx: &NameContext<'_>) -> Option<String> {
    ctx.folded
        .iter()
        .position(|line| KNOWN_COMPANY.is_match(line))
        .map(|idx| normalize_space(ctx.lines[idx]))
}

fn payee_by_company_suffix(ctx: &NameContext<'_>) -> Option<String> {
    ctx.lines.iter().find_map(|line| {
        COMPANY_SUFFIX
            .captures(line)
            .map(|caps| normalize_space(&caps[1]))
            .filter(|candidate| looks_like_name(candidate))
    })
}

fn payee_from_known_list(ctx: &NameContext<'_>) -> Option<String> {
    let folded_text = normalize_for_match(ctx.text);
    ctx.known_payees
        .iter()
        .find(|name| {
            let folded = normalize_for_match(name);
            !folded.is_empty() && folded_text.contains(&folded)
        })
        .cloned()
}

/// Payee name via the ordered strategy list.
pub fn extract_payee_name(text: &str, known_payees: &[String]) -> Option<String> {
    let lines = non_empty_lines(text);
    let folded = lines.iter().map(|l| normalize_for_match(l)).collect();
    let ctx = NameContext {
        lines,
        folded,
        text,
        known_payees,
    };

    PAYEE_STRATEGIES.iter().find_map(|(name, strategy)| {
        let value = strategy(&ctx).filter(|v| looks_like_name(v))?;
        tracing::debug!(strategy = *name, "payee name resolved");
        Some(value)
    })
}

/// Payer name: label-anchored only.
pub fn extract_payer_name(text: &str) -> Option<String> {
    let lines = non_empty_lines(text);
    find_labeled_value(&lines, PAYER_LABELS, &[])
        .map(|v| strip_trailing_ids(&v))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        super::super::lexicon::KNOWN_PAYEES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_looks_like_name() {
        assert!(looks_like_name("ACME Comercio Ltda"));
        assert!(!looks_like_name("ACME"));
        assert!(!looks_like_name("Nosso Numero 123"));
        assert!(!looks_like_name("12345 AB"));
        assert!(!looks_like_name("A1 B2 C3 D4"));
    }

    #[test]
    fn test_payee_by_label() {
        let text = "Beneficiário: ACME Comercio Ltda - CNPJ 11.222.333/0001-81\nPagador: Maria";
        assert_eq!(extract_payee_name(text, &known()), Some("ACME Comercio Ltda".to_string()));
    }

    #[test]
    fn test_payee_by_offset_skips_admin_lines() {
        let text = "Beneficiário\nAgência/Código do Beneficiário\nJoaquim Pereira Transportes\nValor";
        assert_eq!(
            extract_payee_name(text, &known()),
            Some("Joaquim Pereira Transportes".to_string())
        );
    }

    #[test]
    fn test_payee_near_registration_anchor() {
        let text = "Fatura mensal\nSuper Internet Provedor\nCNPJ Matriz 11.222.333/0001-81";
        assert_eq!(
            extract_payee_name(text, &known()),
            Some("Super Internet Provedor".to_string())
        );
    }

    #[test]
    fn test_payee_by_company_suffix() {
        let text = "Conta referente a setembro\nServicos Gerais do Sul LTDA\n";
        assert_eq!(
            extract_payee_name(text, &known()),
            Some("Servicos Gerais do Sul LTDA".to_string())
        );
    }

    #[test]
    fn test_payee_none() {
        assert_eq!(extract_payee_name("nada relevante", &known()), None);
    }

    #[test]
    fn test_payer_name() {
        let text = "Pagador: MARIA DA SILVA - CPF: 529.982.247-25\nRua X, 1";
        assert_eq!(extract_payer_name(text), Some("MARIA DA SILVA".to_string()));
        assert_eq!(extract_payer_name("Beneficiario: X"), None);
    }
}
