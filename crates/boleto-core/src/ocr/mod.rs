//! OCR through external tooling.
//!
//! OCR is a black box producing text from a PDF. The engine only depends on
//! [`OcrBackend`]; [`TesseractCli`] drives `pdftoppm` and `tesseract`.

mod tesseract;

pub use tesseract::TesseractCli;

use std::path::Path;

use crate::error::OcrError;

/// Text recognition over a whole PDF.
pub trait OcrBackend: Send + Sync {
    /// Host components this backend needs but cannot find.
    fn missing_components(&self) -> Vec<String>;

    /// Recognize the text of every page, pages separated by newlines.
    fn recognize_pdf(&self, path: &Path) -> Result<String, OcrError>;
}
