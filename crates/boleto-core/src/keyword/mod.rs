//! Custom keyword extraction.
//!
//! A [`KeywordDefinition`] names one or more anchors and a strategy for
//! locating the value relative to them:
//!
//! - `after_label`: text following the anchor on the same line only
//! - `next_line`: the first non-empty line after the anchor line
//! - `below_n_lines`: a window of lines strictly below the anchor line
//! - `nearest_match`: a window around the anchor line, nearest lines first
//! - `regex`: a case-insensitive pattern over the whole text
//!
//! The located text is then narrowed by value type (largest amount, first
//! date, validated CPF/CNPJ, ...) and screened by the noise filter.

pub mod noise;
pub mod window;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::error::KeywordError;
use crate::models::{ExtractionConfig, KeywordDefinition, Strategy, ValueType};
use crate::rules::lexicon::NOISE_STOP_PHRASES;
use crate::text::{FoldedLine, non_empty_lines, normalize_for_match};

pub use noise::is_noise_value;
pub use window::looks_like_title;

const DEFAULT_WINDOW_LINES: usize = 3;

/// An anchor occurrence: line index and the text after the anchor.
struct AnchorHit<'a> {
    line: usize,
    rest: &'a str,
}

/// Custom keyword extractor.
pub struct KeywordExtractor {
    stop_phrases: Vec<String>,
    default_window: usize,
}

impl KeywordExtractor {
    /// Extractor with the builtin stop phrases.
    pub fn new() -> Self {
        Self {
            stop_phrases: NOISE_STOP_PHRASES.iter().map(|s| s.to_string()).collect(),
            default_window: DEFAULT_WINDOW_LINES,
        }
    }

    /// Extractor configured from the extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            stop_phrases: config
                .stop_phrases
                .iter()
                .map(|p| normalize_for_match(p))
                .filter(|p| !p.is_empty())
                .collect(),
            default_window: config.default_window_lines.max(1),
        }
    }

    /// Extract the value of `definition` from `text`.
    ///
    /// Misses and malformed definitions yield `None`.
    pub fn extract(&self, definition: &KeywordDefinition, text: &str) -> Option<String> {
        let anchors: Vec<String> = definition
            .anchors
            .iter()
            .map(|a| normalize_for_match(a))
            .filter(|a| !a.is_empty())
            .collect();
        let phrases: Vec<&str> = anchors
            .iter()
            .chain(self.stop_phrases.iter())
            .map(String::as_str)
            .collect();
        let accept = |value: &String| !is_noise_value(value, definition.value_type, &phrases);

        let value = if definition.strategy == Strategy::Regex {
            self.by_regex(definition, text, &accept)
        } else {
            let lines = non_empty_lines(text);
            let hits = anchor_hits(&lines, &anchors);
            let window = definition
                .params
                .max_lines
                .unwrap_or_else(|| definition.value_type.default_window(self.default_window))
                .clamp(1, lines.len().max(1));

            hits.iter().find_map(|hit| {
                let segments = scope(definition.strategy, definition.value_type, &lines, hit, window);
                window::candidates(definition.value_type, &segments)
                    .into_iter()
                    .find(|v| accept(v))
            })
        };

        debug!(
            label = %definition.label,
            strategy = definition.strategy.as_str(),
            value_type = definition.value_type.as_str(),
            found = value.is_some(),
            "custom keyword evaluated"
        );
        value
    }

    fn by_regex<F>(&self, definition: &KeywordDefinition, text: &str, accept: &F) -> Option<String>
    where
        F: Fn(&String) -> bool,
    {
        let regex = match compile_pattern(definition) {
            Ok(regex) => regex,
            Err(e) => {
                warn!(error = %e, "custom keyword skipped");
                return None;
            }
        };

        let caps = regex.captures(text)?;
        let matched = caps.get(1).or_else(|| caps.get(0))?.as_str().trim();
        window::candidates(definition.value_type, &[matched])
            .into_iter()
            .find(|v| accept(v))
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a custom keyword with the default stop phrases and window.
pub fn extract_custom(definition: &KeywordDefinition, text: &str) -> Option<String> {
    KeywordExtractor::new().extract(definition, text)
}

fn compile_pattern(definition: &KeywordDefinition) -> Result<Regex, KeywordError> {
    let pattern = definition
        .params
        .pattern
        .as_deref()
        .ok_or_else(|| KeywordError::MissingPattern(definition.label.clone()))?;

    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| KeywordError::InvalidPattern {
            label: definition.label.clone(),
            reason: e.to_string(),
        })
}

/// Every line containing an anchor, with the text after the first anchor
/// found on it. Anchors are tried in order.
fn anchor_hits<'a>(lines: &[&'a str], anchors: &[String]) -> Vec<AnchorHit<'a>> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, &line)| {
            let folded = FoldedLine::new(line);
            anchors
                .iter()
                .find_map(|anchor| folded.after(anchor))
                .map(|rest| AnchorHit { line: idx, rest })
        })
        .collect()
}

/// Text segments a strategy looks at for one anchor hit, in priority order.
fn scope<'a>(
    strategy: Strategy,
    value_type: ValueType,
    lines: &[&'a str],
    hit: &AnchorHit<'a>,
    window: usize,
) -> Vec<&'a str> {
    let below = |n: usize| -> Vec<&'a str> {
        lines.iter().skip(hit.line + 1).take(n).copied().collect()
    };

    match strategy {
        Strategy::AfterLabel => {
            let rest = hit.rest.trim_start_matches([' ', ':', '-', '\t']).trim_end();
            if rest.is_empty() { Vec::new() } else { vec![rest] }
        }
        Strategy::NextLine => below(1),
        Strategy::BelowNLines => below(window),
        Strategy::NearestMatch if value_type == ValueType::Block => {
            std::iter::once(hit.rest).chain(below(window)).collect()
        }
        Strategy::NearestMatch => {
            let mut segments = vec![hit.rest];
            for distance in 1..=window {
                if let Some(&line) = lines.get(hit.line + distance) {
                    segments.push(line);
                }
                if let Some(&line) = hit.line.checked_sub(distance).and_then(|i| lines.get(i)) {
                    segments.push(line);
                }
            }
            segments
        }
        Strategy::Regex => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldKey;

    const INVOICE: &str = "\
Fatura de serviços
Taxa
Referente ao mês de abril

Serviço prestado R$ 45,90
Protocolo: AB-2024-77
Plano:
Empresarial Plus
Vencimento 10/05/2024
CEP 88015-100";

    #[test]
    fn test_below_n_lines_money() {
        let def = KeywordDefinition::new("Taxa", ValueType::Money)
            .with_strategy(Strategy::BelowNLines)
            .with_max_lines(3);
        assert_eq!(extract_custom(&def, INVOICE), Some("45.90".to_string()));
    }

    #[test]
    fn test_below_n_lines_missing_anchor() {
        let def = KeywordDefinition::new("Mensalidade", ValueType::Money)
            .with_strategy(Strategy::BelowNLines);
        assert_eq!(extract_custom(&def, INVOICE), None);
    }

    #[test]
    fn test_after_label_same_line_only() {
        let def = KeywordDefinition::new("Protocolo", ValueType::Id);
        assert_eq!(extract_custom(&def, INVOICE), Some("AB-2024-77".to_string()));

        // Nothing after the anchor on its line: no fallback to the next line.
        let def = KeywordDefinition::new("Plano", ValueType::Text);
        assert_eq!(extract_custom(&def, INVOICE), None);
    }

    #[test]
    fn test_next_line() {
        let def = KeywordDefinition::new("Plano", ValueType::Text).with_strategy(Strategy::NextLine);
        assert_eq!(extract_custom(&def, INVOICE), Some("Empresarial Plus".to_string()));
    }

    #[test]
    fn test_nearest_match_date_and_postal() {
        let def = KeywordDefinition::new("Empresarial", ValueType::Date)
            .with_strategy(Strategy::NearestMatch)
            .with_max_lines(2);
        assert_eq!(extract_custom(&def, INVOICE), Some("2024-05-10".to_string()));

        let def = KeywordDefinition::new("CEP", ValueType::Postal).with_strategy(Strategy::NearestMatch);
        assert_eq!(extract_custom(&def, INVOICE), Some("88015-100".to_string()));
    }

    #[test]
    fn test_regex_strategy() {
        let def = KeywordDefinition::new("Protocolo", ValueType::Text)
            .with_strategy(Strategy::Regex)
            .with_pattern(r"protocolo:\s*([A-Z]{2}-\d{4})");
        assert_eq!(extract_custom(&def, INVOICE), None, "AB-2024 has fewer letters than digits");

        let def = KeywordDefinition::new("Serviço", ValueType::Money)
            .with_strategy(Strategy::Regex)
            .with_pattern(r"servi[cç]o prestado r\$\s*([\d.,]+)");
        assert_eq!(extract_custom(&def, INVOICE), Some("45.90".to_string()));
    }

    #[test]
    fn test_malformed_regex_is_a_miss() {
        let def = KeywordDefinition::new("Protocolo", ValueType::Text)
            .with_strategy(Strategy::Regex)
            .with_pattern("(unclosed");
        assert_eq!(extract_custom(&def, INVOICE), None);

        let def = KeywordDefinition::new("Protocolo", ValueType::Text).with_strategy(Strategy::Regex);
        assert_eq!(extract_custom(&def, INVOICE), None);
    }

    #[test]
    fn test_anchor_echo_rejected() {
        let text = "Referência\nReferencia\nMarço";
        let def = KeywordDefinition::new("Referência", ValueType::Text).with_strategy(Strategy::NextLine);
        // The line after the first anchor echoes the anchor; the second
        // anchor hit yields the real value.
        assert_eq!(extract_custom(&def, text), Some("Março".to_string()));
    }

    #[test]
    fn test_builtin_alias_keeps_type_dispatch() {
        let def = KeywordDefinition::new("Vencimento", ValueType::Date).with_builtin(FieldKey::DueDate);
        assert_eq!(extract_custom(&def, INVOICE), Some("2024-05-10".to_string()));
    }

    #[test]
    fn test_oversized_window_is_bounded_by_text() {
        let text = "Taxa\nR$ 45,90";
        for strategy in [Strategy::NearestMatch, Strategy::BelowNLines] {
            let def = KeywordDefinition::new("Taxa", ValueType::Money)
                .with_strategy(strategy)
                .with_max_lines(2_000_000_000);
            let start = std::time::Instant::now();
            assert_eq!(extract_custom(&def, text), Some("45.90".to_string()));
            assert!(start.elapsed() < std::time::Duration::from_secs(1));
        }
    }

    #[test]
    fn test_block_window() {
        let text = "OBSERVAÇÕES\nPagamento via PIX\nou boleto\nDADOS DO PAGADOR\nMaria";
        let def = KeywordDefinition::new("Observações", ValueType::Block).with_max_lines(4);
        assert_eq!(def.strategy, Strategy::BelowNLines);
        assert_eq!(
            extract_custom(&def, text),
            Some("Pagamento via PIX\nou boleto".to_string())
        );
    }
}
