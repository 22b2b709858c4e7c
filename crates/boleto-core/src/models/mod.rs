//! Data models for the extraction engine.

pub mod config;
pub mod field;
pub mod keyword;
pub mod result;

pub use config::{BoletoConfig, ExtractionConfig, OcrConfig, QualityConfig};
pub use field::{FieldKey, ValueType, legacy_alias};
pub use keyword::{
    KEYWORD_PREFIX, KeywordDefinition, KeywordMap, RawKeywordDefinition, ResolvedKind, Strategy,
    StrategyParams, is_keyword_token, keyword_map_from_json, parse_keyword_ids,
};
pub use result::{
    CustomFieldValue, Diagnostics, DocumentAttributes, ExtractionResult, PhaseTimings, ProcessOutcome,
};
