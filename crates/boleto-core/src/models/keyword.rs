//! User-defined keyword definitions.
//!
//! Definitions arrive from persistence as loosely typed records
//! ([`RawKeywordDefinition`]); [`KeywordDefinition::from_raw`] maps every
//! field onto a closed enum with a fixed fallback so stored configuration
//! can never fail a document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::field::{FieldKey, ValueType};
use crate::error::{BoletoError, Result};

/// Prefix of keyword reference tokens in a field selection (`kw:<id>`).
pub const KEYWORD_PREFIX: &str = "kw:";

/// Window used by `below_n_lines` when the stored params carry none.
const BELOW_N_LINES_DEFAULT: usize = 3;

/// Keyword references to their definitions, as supplied by the caller.
pub type KeywordMap = HashMap<String, KeywordDefinition>;

/// How a keyword locates its value relative to its anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    AfterLabel,
    NextLine,
    BelowNLines,
    Regex,
    NearestMatch,
}

impl Strategy {
    /// Parse a stored strategy; unknown names map to [`Strategy::AfterLabel`].
    pub fn parse_lenient(value: &str) -> Strategy {
        match value.trim().to_lowercase().as_str() {
            "next_line" => Strategy::NextLine,
            "below_n_lines" => Strategy::BelowNLines,
            "regex" => Strategy::Regex,
            "nearest_match" => Strategy::NearestMatch,
            _ => Strategy::AfterLabel,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::AfterLabel => "after_label",
            Strategy::NextLine => "next_line",
            Strategy::BelowNLines => "below_n_lines",
            Strategy::Regex => "regex",
            Strategy::NearestMatch => "nearest_match",
        }
    }
}

/// Strategy parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Window size for the windowed strategies.
    pub max_lines: Option<usize>,
    /// Pattern for the regex strategy.
    pub pattern: Option<String>,
}

impl StrategyParams {
    /// Read params from a stored JSON value. Objects and JSON-encoded
    /// objects are accepted; anything else yields empty params.
    pub fn from_value(value: &Value) -> StrategyParams {
        match value {
            Value::Object(map) => StrategyParams {
                max_lines: map.get("max_lines").and_then(value_as_usize),
                pattern: map
                    .get("pattern")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .filter(|p| !p.trim().is_empty()),
            },
            Value::String(encoded) if !encoded.trim().is_empty() => serde_json::from_str(encoded)
                .map(|decoded: Value| StrategyParams::from_value(&decoded))
                .unwrap_or_default(),
            _ => StrategyParams::default(),
        }
    }
}

fn value_as_usize(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a keyword aliases a builtin field or defines a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedKind {
    Builtin(FieldKey),
    Custom,
}

/// A keyword definition as stored by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawKeywordDefinition {
    pub label: String,
    pub anchors: Vec<String>,
    pub value_type: Option<String>,
    pub strategy: Option<String>,
    pub strategy_params: Value,
    pub resolved_kind: Option<String>,
    pub field_key: Option<String>,
}

/// A normalized keyword definition.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordDefinition {
    pub label: String,
    /// Never empty: defaults to the label.
    pub anchors: Vec<String>,
    pub value_type: ValueType,
    pub strategy: Strategy,
    pub params: StrategyParams,
    pub resolved_kind: ResolvedKind,
}

impl KeywordDefinition {
    /// A custom keyword with default strategy for its type.
    pub fn new(label: impl Into<String>, value_type: ValueType) -> Self {
        let label = label.into();
        let strategy = default_strategy(value_type);
        let mut params = StrategyParams::default();
        if strategy == Strategy::BelowNLines {
            params.max_lines = Some(value_type.default_window(BELOW_N_LINES_DEFAULT));
        }
        Self {
            anchors: vec![label.clone()],
            label,
            value_type,
            strategy,
            params,
            resolved_kind: ResolvedKind::Custom,
        }
    }

    pub fn with_anchors<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let anchors: Vec<String> = anchors
            .into_iter()
            .map(Into::into)
            .filter(|a| !a.trim().is_empty())
            .collect();
        if !anchors.is_empty() {
            self.anchors = anchors;
        }
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        if strategy == Strategy::BelowNLines && self.params.max_lines.is_none() {
            self.params.max_lines = Some(self.value_type.default_window(BELOW_N_LINES_DEFAULT));
        }
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.params.max_lines = Some(max_lines);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.params.pattern = Some(pattern.into());
        self
    }

    pub fn with_builtin(mut self, key: FieldKey) -> Self {
        self.resolved_kind = ResolvedKind::Builtin(key);
        self
    }

    /// Normalize a stored definition.
    ///
    /// Empty anchors default to the label; an unknown value type becomes
    /// `text`; a missing strategy becomes `below_n_lines` for blocks and
    /// `after_label` otherwise, an unknown one `after_label`; params that
    /// are not an object are dropped, and `below_n_lines` always carries a
    /// `max_lines`, the value type's default window when unset.
    pub fn from_raw(raw: RawKeywordDefinition) -> Self {
        let label = raw.label.trim().to_string();
        let value_type = raw
            .value_type
            .as_deref()
            .map(ValueType::parse_lenient)
            .unwrap_or_default();
        let strategy = match raw.strategy.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Strategy::parse_lenient(s),
            _ => default_strategy(value_type),
        };

        let mut params = StrategyParams::from_value(&raw.strategy_params);
        if strategy == Strategy::BelowNLines && params.max_lines.is_none() {
            params.max_lines = Some(value_type.default_window(BELOW_N_LINES_DEFAULT));
        }

        let builtin = raw
            .field_key
            .as_deref()
            .and_then(FieldKey::resolve)
            .filter(|_| raw.resolved_kind.as_deref().map(str::trim) == Some("builtin"));
        let resolved_kind = builtin.map_or(ResolvedKind::Custom, ResolvedKind::Builtin);

        let mut anchors: Vec<String> = raw
            .anchors
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if anchors.is_empty() {
            anchors.push(label.clone());
        }

        Self {
            label,
            anchors,
            value_type,
            strategy,
            params,
            resolved_kind,
        }
    }

    /// The builtin field this keyword aliases, if any.
    pub fn field_key(&self) -> Option<FieldKey> {
        match self.resolved_kind {
            ResolvedKind::Builtin(key) => Some(key),
            ResolvedKind::Custom => None,
        }
    }
}

fn default_strategy(value_type: ValueType) -> Strategy {
    if value_type == ValueType::Block {
        Strategy::BelowNLines
    } else {
        Strategy::AfterLabel
    }
}

/// Whether a selected field is a keyword reference.
pub fn is_keyword_token(field: &str) -> bool {
    field.starts_with(KEYWORD_PREFIX)
}

/// Numeric ids of the keyword references in a field selection.
pub fn parse_keyword_ids<S: AsRef<str>>(selected: &[S]) -> Vec<u64> {
    selected
        .iter()
        .filter_map(|field| field.as_ref().strip_prefix(KEYWORD_PREFIX))
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|id| id.parse().ok())
        .collect()
}

/// Build a keyword map from JSON.
///
/// Accepts an object keyed by reference token (`{"kw:3": {...}}`) or an
/// array of definitions carrying an `id`, which are keyed as `kw:<id>`.
pub fn keyword_map_from_json(json: &str) -> Result<KeywordMap> {
    let value: Value = serde_json::from_str(json)?;
    let mut map = KeywordMap::new();

    match value {
        Value::Object(entries) => {
            for (token, raw) in entries {
                let raw: RawKeywordDefinition = serde_json::from_value(raw)?;
                map.insert(token, KeywordDefinition::from_raw(raw));
            }
        }
        Value::Array(items) => {
            for item in items {
                let id = item
                    .get("id")
                    .and_then(value_as_usize)
                    .ok_or_else(|| BoletoError::Config("keyword definition without id".to_string()))?;
                let raw: RawKeywordDefinition = serde_json::from_value(item)?;
                map.insert(format!("{KEYWORD_PREFIX}{id}"), KeywordDefinition::from_raw(raw));
            }
        }
        _ => {
            return Err(BoletoError::Config(
                "keyword definitions must be an object or an array".to_string(),
            ));
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawKeywordDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_raw_defaults() {
        let def = KeywordDefinition::from_raw(raw(json!({"label": " Taxa "})));
        assert_eq!(def.label, "Taxa");
        assert_eq!(def.anchors, vec!["Taxa".to_string()]);
        assert_eq!(def.value_type, ValueType::Text);
        assert_eq!(def.strategy, Strategy::AfterLabel);
        assert_eq!(def.params, StrategyParams::default());
        assert_eq!(def.resolved_kind, ResolvedKind::Custom);
    }

    #[test]
    fn test_from_raw_block_defaults_to_below_n_lines() {
        let def = KeywordDefinition::from_raw(raw(json!({
            "label": "Observações",
            "value_type": "block",
        })));
        assert_eq!(def.strategy, Strategy::BelowNLines);
        assert_eq!(def.params.max_lines, Some(6));

        let def = KeywordDefinition::from_raw(raw(json!({
            "label": "Taxa",
            "value_type": "money",
            "strategy": "below_n_lines",
        })));
        assert_eq!(def.params.max_lines, Some(3));

        let def = KeywordDefinition::new("Endereço", ValueType::Address).with_strategy(Strategy::BelowNLines);
        assert_eq!(def.params.max_lines, Some(2));
    }

    #[test]
    fn test_from_raw_unknown_values_fall_back() {
        let def = KeywordDefinition::from_raw(raw(json!({
            "label": "Taxa",
            "value_type": "currency",
            "strategy": "fuzzy",
            "strategy_params": [1, 2],
            "anchors": ["", "  "],
        })));
        assert_eq!(def.value_type, ValueType::Text);
        assert_eq!(def.strategy, Strategy::AfterLabel);
        assert_eq!(def.params, StrategyParams::default());
        assert_eq!(def.anchors, vec!["Taxa".to_string()]);
    }

    #[test]
    fn test_from_raw_params() {
        let def = KeywordDefinition::from_raw(raw(json!({
            "label": "Taxa",
            "value_type": "money",
            "strategy": "below_n_lines",
            "strategy_params": "{\"max_lines\": \"5\"}",
        })));
        assert_eq!(def.params.max_lines, Some(5));

        let def = KeywordDefinition::from_raw(raw(json!({
            "label": "Protocolo",
            "strategy": "regex",
            "strategy_params": {"pattern": "protocolo\\s+(\\d+)"},
        })));
        assert_eq!(def.params.pattern.as_deref(), Some("protocolo\\s+(\\d+)"));
    }

    #[test]
    fn test_from_raw_builtin() {
        let def = KeywordDefinition::from_raw(raw(json!({
            "label": "Vencto",
            "resolved_kind": "builtin",
            "field_key": "due_date",
        })));
        assert_eq!(def.field_key(), Some(FieldKey::DueDate));

        let def = KeywordDefinition::from_raw(raw(json!({
            "label": "X",
            "resolved_kind": "builtin",
            "field_key": "nonexistent",
        })));
        assert_eq!(def.resolved_kind, ResolvedKind::Custom);
    }

    #[test]
    fn test_parse_keyword_ids() {
        let selected = ["due_date", "kw:12", "kw:abc", "kw:", "kw:7"];
        assert_eq!(parse_keyword_ids(&selected), vec![12, 7]);
    }

    #[test]
    fn test_keyword_map_from_json() {
        let map = keyword_map_from_json(r#"[{"id": 4, "label": "Taxa", "value_type": "money"}]"#).unwrap();
        assert_eq!(map["kw:4"].value_type, ValueType::Money);

        let map = keyword_map_from_json(r#"{"kw:9": {"label": "Contrato"}}"#).unwrap();
        assert_eq!(map["kw:9"].label, "Contrato");

        assert!(keyword_map_from_json("42").is_err());
        assert!(keyword_map_from_json(r#"[{"label": "sem id"}]"#).is_err());
    }
}
