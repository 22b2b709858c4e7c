//! Text acquisition: the PDF text layer when it is good enough, OCR
//! otherwise.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{BoletoError, PdfError, Result};
use crate::models::QualityConfig;
use crate::ocr::OcrBackend;
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::text::word_count;

/// Text obtained for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredText {
    pub text: String,
    pub ocr_used: bool,
    /// Word count, reported for diagnostics.
    pub quality: usize,
}

impl AcquiredText {
    fn new(text: String, ocr_used: bool) -> Self {
        let quality = word_count(&text);
        Self {
            text,
            ocr_used,
            quality,
        }
    }
}

/// Fail with `UnsupportedFormat` unless `path` names a PDF.
pub fn ensure_pdf(path: &Path) -> Result<()> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Ok(())
    } else {
        Err(BoletoError::UnsupportedFormat(path.display().to_string()))
    }
}

/// Whether a text layer is too thin to trust.
pub fn is_weak(text: &str, quality: &QualityConfig) -> bool {
    let chars = text.chars().filter(|c| !c.is_whitespace()).count();
    chars < quality.min_chars || word_count(text) < quality.min_words
}

/// Text layer of the PDF at `path`, pages joined with newlines.
pub fn extract_text_layer(path: &Path) -> std::result::Result<String, PdfError> {
    PdfExtractor::open(path)?.extract_text()
}

/// Chooses between the text layer and OCR for a document.
pub struct TextAcquirer<'a> {
    quality: &'a QualityConfig,
    ocr: &'a dyn OcrBackend,
}

impl<'a> TextAcquirer<'a> {
    pub fn new(quality: &'a QualityConfig, ocr: &'a dyn OcrBackend) -> Self {
        Self { quality, ocr }
    }

    /// Acquire the text of `path`.
    ///
    /// The text layer is tried first unless `force_ocr` is set. A weak or
    /// failed text layer goes to OCR. When OCR fails too, any non-empty
    /// text layer is kept; only when neither produced text does this fail.
    pub fn acquire(&self, path: &Path, force_ocr: bool) -> Result<AcquiredText> {
        ensure_pdf(path)?;
        std::fs::metadata(path)?;

        let direct = if force_ocr {
            None
        } else {
            Some(extract_text_layer(path))
        };

        match &direct {
            Some(Ok(text)) if !is_weak(text, self.quality) => {
                let acquired = AcquiredText::new(text.clone(), false);
                info!(ocr_used = false, quality = acquired.quality, "text layer accepted");
                return Ok(acquired);
            }
            Some(Ok(text)) => debug!(chars = text.len(), "text layer is weak, trying OCR"),
            Some(Err(e)) => warn!(error = %e, "text layer extraction failed, trying OCR"),
            None => debug!("OCR forced"),
        }

        let ocr_error = match self.ocr.recognize_pdf(path) {
            Ok(text) => {
                let acquired = AcquiredText::new(text, true);
                info!(ocr_used = true, quality = acquired.quality, "OCR text accepted");
                return Ok(acquired);
            }
            Err(e) => e,
        };
        warn!(error = %ocr_error, "OCR failed");

        let fallback = match direct {
            Some(result) => result.ok(),
            None => extract_text_layer(path).ok(),
        };
        match fallback.filter(|text| !text.trim().is_empty()) {
            Some(text) => {
                let acquired = AcquiredText::new(text, false);
                info!(quality = acquired.quality, "keeping weak text layer after OCR failure");
                Ok(acquired)
            }
            None => Err(BoletoError::NoText(ocr_error)),
        }
    }

    /// OCR text only, for targeted retries.
    pub fn ocr_text(&self, path: &Path) -> Option<String> {
        match self.ocr.recognize_pdf(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "OCR retry failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_pdf() {
        assert!(ensure_pdf(Path::new("boleto.PDF")).is_ok());
        assert!(ensure_pdf(Path::new("/tmp/a/boleto.pdf")).is_ok());
        assert!(matches!(
            ensure_pdf(Path::new("boleto.png")),
            Err(BoletoError::UnsupportedFormat(_))
        ));
        assert!(ensure_pdf(Path::new("boleto")).is_err());
    }

    #[test]
    fn test_is_weak() {
        let quality = QualityConfig::default();
        assert!(is_weak("", &quality));
        assert!(is_weak(&"palavra ".repeat(20), &quality));
        assert!(is_weak(&"x".repeat(500), &quality));
        assert!(!is_weak(&"palavras ".repeat(40), &quality));
    }
}
