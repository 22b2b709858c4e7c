//! Instruction text (interest, penalty and protest clauses).

use super::lexicon::INSTRUCTION_KEYWORDS;
use crate::text::{contains_any, non_empty_lines, normalize_for_match, normalize_space};

const SEPARATOR: &str = " | ";

/// Every line mentioning an instruction keyword, deduplicated, joined
/// with `" | "`.
pub fn extract_instructions(text: &str) -> Option<String> {
    let mut collected: Vec<String> = Vec::new();

    for line in non_empty_lines(text) {
        if !contains_any(&normalize_for_match(line), INSTRUCTION_KEYWORDS) {
            continue;
        }
        let line = normalize_space(line);
        if !collected.contains(&line) {
            collected.push(line);
        }
    }

    (!collected.is_empty()).then(|| collected.join(SEPARATOR))
}
