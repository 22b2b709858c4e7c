//! Document processing: text acquisition, builtin and custom field
//! extraction, classification and sanitization for one PDF.

pub mod builtin;
pub mod masking;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::acquisition::{AcquiredText, TextAcquirer, ensure_pdf};
use crate::classifier::classify;
use crate::error::Result;
use crate::keyword::KeywordExtractor;
use crate::models::{
    BoletoConfig, CustomFieldValue, Diagnostics, DocumentAttributes, ExtractionResult, FieldKey,
    KeywordDefinition, KeywordMap, PhaseTimings, ProcessOutcome, ResolvedKind, ValueType,
    is_keyword_token,
};
use crate::ocr::{OcrBackend, TesseractCli};
use crate::rules::{extract_age, extract_experience_years, extract_phone};
use crate::sanitizer::sanitize_result;
use crate::text::normalize_for_match;

pub use builtin::BuiltinExtractor;
pub use masking::mask_value;

/// Selected fields split into builtin keys and custom keywords.
#[derive(Debug, Default)]
pub struct SelectionPlan<'k> {
    pub builtins: Vec<FieldKey>,
    pub keywords: Vec<(String, &'k KeywordDefinition)>,
    /// Keyword tokens with no definition in the map.
    pub missing_keywords: Vec<String>,
}

impl<'k> SelectionPlan<'k> {
    /// Partition `selected`. Legacy keys are aliased, keywords that alias a
    /// builtin field join the builtin keys, and unknown keys are dropped.
    pub fn build(selected: &[String], keywords: &'k KeywordMap) -> Self {
        let mut plan = SelectionPlan::default();

        for token in selected {
            if is_keyword_token(token) {
                match keywords.get(token) {
                    Some(definition) => match definition.resolved_kind {
                        ResolvedKind::Builtin(key) => plan.push_builtin(key),
                        ResolvedKind::Custom => plan.keywords.push((token.clone(), definition)),
                    },
                    None => {
                        warn!(token = %token, "keyword definition not found, skipping");
                        plan.missing_keywords.push(token.clone());
                    }
                }
                continue;
            }

            match FieldKey::resolve(token) {
                Some(key) => plan.push_builtin(key),
                None => warn!(field = %token, "unknown field, skipping"),
            }
        }

        plan
    }

    fn push_builtin(&mut self, key: FieldKey) {
        if !self.builtins.contains(&key) {
            self.builtins.push(key);
        }
    }
}

/// Trimmed, non-empty selection with duplicates removed, order kept.
pub fn dedupe_selection<S: AsRef<str>>(selected: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    selected
        .iter()
        .map(|field| field.as_ref().trim())
        .filter(|field| !field.is_empty() && seen.insert(*field))
        .map(str::to_string)
        .collect()
}

/// Attributes indexed alongside the document text.
pub fn document_attributes(text: &str) -> DocumentAttributes {
    DocumentAttributes {
        normalized_text: normalize_for_match(text),
        contact_phone: extract_phone(text),
        age_years: extract_age(text),
        experience_years: extract_experience_years(text),
    }
}

fn log_field(field: &str, value_type: ValueType, value: Option<&str>) {
    match value {
        Some(value) => info!(field, value = %mask_value(value_type, value), "field found"),
        None => info!(field, "field missing"),
    }
}

/// Processes PDF documents into sanitized extraction results.
pub struct DocumentProcessor {
    config: BoletoConfig,
    ocr: Box<dyn OcrBackend>,
}

impl DocumentProcessor {
    /// Processor using the command-line Tesseract backend.
    pub fn new(config: BoletoConfig) -> Self {
        let ocr = Box::new(TesseractCli::new(config.ocr.clone()));
        Self { config, ocr }
    }

    /// Processor with an explicit OCR backend.
    pub fn with_backend(config: BoletoConfig, ocr: Box<dyn OcrBackend>) -> Self {
        Self { config, ocr }
    }

    pub fn config(&self) -> &BoletoConfig {
        &self.config
    }

    /// Document text only, with the same acquisition policy as
    /// [`process_document`](Self::process_document).
    pub fn acquire_text(&self, path: &Path, force_ocr: bool) -> Result<AcquiredText> {
        TextAcquirer::new(&self.config.quality, self.ocr.as_ref()).acquire(path, force_ocr)
    }

    /// Process the PDF at `path`.
    ///
    /// Only the builtin fields in `selected_fields` are extracted; `kw:<id>`
    /// tokens are resolved through `keywords`. Fields that are not found are
    /// left `None` and reported in the diagnostics. The call fails only when
    /// the input is not a PDF or no text could be obtained at all.
    pub fn process_document<S: AsRef<str>>(
        &self,
        path: &Path,
        selected_fields: &[S],
        keywords: &KeywordMap,
        force_ocr: bool,
    ) -> Result<ProcessOutcome> {
        let started = Instant::now();
        let mut timings = PhaseTimings::default();

        ensure_pdf(path)?;
        let selected = dedupe_selection(selected_fields);
        let file = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        info!(file = %file, fields = selected.len(), force_ocr, "processing document");

        let acquirer = TextAcquirer::new(&self.config.quality, self.ocr.as_ref());
        let phase = Instant::now();
        let acquired = acquirer.acquire(path, force_ocr)?;
        timings.acquisition = phase.elapsed();
        debug!(ocr_used = acquired.ocr_used, quality = acquired.quality, elapsed = ?timings.acquisition, "text acquired");

        let plan = SelectionPlan::build(&selected, keywords);
        let builtin = BuiltinExtractor::new(&self.config.extraction.known_payees);

        let phase = Instant::now();
        let mut values = builtin.extract(&plan.builtins, &acquired.text);
        timings.builtin = phase.elapsed();

        let missing_payer: Vec<FieldKey> = values
            .iter()
            .filter(|(key, value)| key.is_payer() && value.is_none())
            .map(|(key, _)| *key)
            .collect();
        for key in &missing_payer {
            warn!(field = key.as_str(), "not found in payer block");
        }

        // The OCR text of a payer retry is appended, so keywords,
        // classification and attributes see it as well.
        let mut text = acquired.text;
        let phase = Instant::now();
        let mut payer_retry_used = false;
        if !missing_payer.is_empty() && !acquired.ocr_used && self.config.extraction.payer_ocr_retry {
            info!(fields = missing_payer.len(), "retrying payer fields over OCR text");
            if let Some(ocr_text) = acquirer.ocr_text(path) {
                payer_retry_used = true;
                for (key, value) in builtin.extract(&missing_payer, &ocr_text) {
                    let Some(value) = value else {
                        continue;
                    };
                    if let Some(slot) = values.iter_mut().find(|(k, _)| *k == key) {
                        info!(field = key.as_str(), "payer field recovered by OCR");
                        slot.1 = Some(value);
                    }
                }
                text.push('\n');
                text.push_str(&ocr_text);
            }
        }
        timings.payer_retry = phase.elapsed();

        let mut missing_fields = Vec::new();
        for (key, value) in &values {
            log_field(key.as_str(), key.value_type(), value.as_deref());
            if value.is_none() {
                missing_fields.push(key.as_str().to_string());
            }
        }

        let phase = Instant::now();
        let keyword_extractor = KeywordExtractor::from_config(&self.config.extraction);
        let mut custom_fields = BTreeMap::new();
        for (token, definition) in &plan.keywords {
            let value = keyword_extractor.extract(definition, &text);
            log_field(token, definition.value_type, value.as_deref());
            if value.is_none() {
                missing_fields.push(token.clone());
            }
            custom_fields.insert(
                token.clone(),
                CustomFieldValue {
                    label: definition.label.clone(),
                    value,
                },
            );
        }
        timings.keywords = phase.elapsed();

        let document_type = classify(&text).map(|t| t.as_str().to_string());
        let result = sanitize_result(&ExtractionResult {
            document_type,
            fields: values
                .into_iter()
                .map(|(key, value)| (key.as_str().to_string(), value))
                .collect(),
            custom_fields,
        });

        let attributes = document_attributes(&text);
        timings.total = started.elapsed();
        info!(
            file = %file,
            document_type = result.document_type.as_deref().unwrap_or("unknown"),
            missing = missing_fields.len(),
            elapsed = ?timings.total,
            "document processed"
        );

        Ok(ProcessOutcome {
            result,
            raw_text: text,
            ocr_used: acquired.ocr_used,
            quality: acquired.quality,
            attributes,
            diagnostics: Diagnostics {
                selected_fields: selected,
                missing_fields,
                missing_keywords: plan.missing_keywords,
                payer_retry_used,
                timings,
            },
        })
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new(BoletoConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dedupe_selection_keeps_order() {
        let selected = ["due_date", " barcode ", "due_date", "", "kw:1", "barcode"];
        assert_eq!(dedupe_selection(&selected), vec!["due_date", "barcode", "kw:1"]);
    }

    #[test]
    fn test_plan_partitions_selection() {
        let mut keywords = KeywordMap::new();
        keywords.insert("kw:1".to_string(), KeywordDefinition::new("Taxa", ValueType::Money));
        keywords.insert(
            "kw:2".to_string(),
            KeywordDefinition::new("Vencto", ValueType::Date).with_builtin(FieldKey::DueDate),
        );

        let selected = dedupe_selection(&["cnpj", "payee_cnpj", "kw:1", "kw:2", "kw:9", "nonsense", "due_date"]);
        let plan = SelectionPlan::build(&selected, &keywords);

        assert_eq!(plan.builtins, vec![FieldKey::PayeeCnpj, FieldKey::DueDate]);
        assert_eq!(plan.keywords.len(), 1);
        assert_eq!(plan.keywords[0].0, "kw:1");
        assert_eq!(plan.missing_keywords, vec!["kw:9".to_string()]);
    }

    #[test]
    fn test_document_attributes() {
        let attributes = document_attributes("Contato: (11) 98765-4321\nIdade: 34 anos");
        assert_eq!(attributes.contact_phone.as_deref(), Some("+5511987654321"));
        assert_eq!(attributes.age_years, Some(34));
        assert!(attributes.normalized_text.starts_with("contato:"));
    }
}
