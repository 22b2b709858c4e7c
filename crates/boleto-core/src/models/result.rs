//! Extraction output types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A custom keyword result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub label: String,
    pub value: Option<String>,
}

/// The sanitized extraction payload handed to persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Detected document type, `None` when unknown.
    pub document_type: Option<String>,

    /// Builtin fields by key; only known builtin keys appear here.
    pub fields: BTreeMap<String, Option<String>>,

    /// Custom keyword results by reference token.
    pub custom_fields: BTreeMap<String, CustomFieldValue>,
}

impl ExtractionResult {
    /// Value of a builtin field, if found.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    /// Value of a custom field, if found.
    pub fn custom(&self, token: &str) -> Option<&str> {
        self.custom_fields.get(token).and_then(|v| v.value.as_deref())
    }
}

/// Attributes derived from the document text for indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttributes {
    /// Normalized text used for search.
    pub normalized_text: String,
    pub contact_phone: Option<String>,
    pub age_years: Option<u32>,
    pub experience_years: Option<u32>,
}

/// Time spent per pipeline phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub acquisition: Duration,
    pub builtin: Duration,
    pub payer_retry: Duration,
    pub keywords: Duration,
    pub total: Duration,
}

/// Diagnostics from a processing run. Never part of [`ExtractionResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub selected_fields: Vec<String>,
    pub missing_fields: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub payer_retry_used: bool,
    pub timings: PhaseTimings,
}

/// Everything a processing run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub result: ExtractionResult,
    /// Text the fields were read from (OCR text when OCR was used), with
    /// the payer-retry OCR text appended when that ran.
    pub raw_text: String,
    pub ocr_used: bool,
    /// Word count of the acquired text.
    pub quality: usize,
    pub attributes: DocumentAttributes,
    pub diagnostics: Diagnostics,
}
