//! Error types for the boleto-core library.

use thiserror::Error;

/// Maximum length of the failure message handed back to callers.
pub const MAX_USER_MESSAGE_LEN: usize = 5000;

/// Main error type for the boleto library.
#[derive(Error, Debug)]
pub enum BoletoError {
    /// Input is not a PDF.
    #[error("unsupported format: only PDF is supported ({0})")]
    UnsupportedFormat(String),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Neither the text layer nor OCR produced any text.
    #[error("PDF has no selectable text and OCR failed: {0}")]
    NoText(OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BoletoError {
    /// Human-readable failure text for the document record, truncated.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.chars().count() <= MAX_USER_MESSAGE_LEN {
            return message;
        }
        message.chars().take(MAX_USER_MESSAGE_LEN).collect()
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Required OCR tooling is not installed on the host.
    #[error("OCR unavailable, install: {}", .missing.join(", "))]
    Unavailable { missing: Vec<String> },

    /// Rasterizing the PDF into page images failed.
    #[error("OCR failed to convert PDF into images: {0}")]
    Conversion(String),

    /// The OCR engine failed on a page image.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// OCR ran but produced no text.
    #[error("OCR could not extract any text")]
    EmptyResult,
}

/// Errors in a user-defined keyword configuration.
///
/// These never fail a document; the affected keyword is treated as a miss.
#[derive(Error, Debug)]
pub enum KeywordError {
    /// The configured regex does not compile.
    #[error("invalid pattern for {label}: {reason}")]
    InvalidPattern { label: String, reason: String },

    /// The regex strategy was selected without a pattern.
    #[error("regex strategy without pattern for {0}")]
    MissingPattern(String),
}

/// Result type for the boleto library.
pub type Result<T> = std::result::Result<T, BoletoError>;
