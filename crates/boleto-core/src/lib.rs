//! Core library for Brazilian boleto and invoice PDF extraction.
//!
//! This crate provides:
//! - Text acquisition from the PDF text layer with an OCR fallback
//! - Rule-based extraction of builtin fields (dates, amounts, payment
//!   line, CPF/CNPJ, payer and payee blocks)
//! - A custom keyword interpreter driven by caller-supplied definitions
//! - Document classification and output sanitization

pub mod acquisition;
pub mod classifier;
pub mod document;
pub mod error;
pub mod keyword;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod rules;
pub mod sanitizer;
pub mod search;
pub mod text;

pub use acquisition::{AcquiredText, TextAcquirer};
pub use classifier::{DocumentType, classify};
pub use document::{DocumentProcessor, document_attributes};
pub use error::{BoletoError, OcrError, PdfError, Result};
pub use keyword::{KeywordExtractor, extract_custom, is_noise_value};
pub use models::{
    BoletoConfig, CustomFieldValue, ExtractionResult, FieldKey, KeywordDefinition, KeywordMap,
    ProcessOutcome, Strategy, ValueType,
};
pub use ocr::{OcrBackend, TesseractCli};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use sanitizer::{sanitize, sanitize_result};
pub use text::normalize_for_match;
