//! Configuration structures for the extraction engine.
//!
//! A [`BoletoConfig`] is built once at process start (optionally from a
//! JSON file, then overlaid with the environment) and handed to the engine
//! by reference. The engine never consults the environment itself.

use serde::{Deserialize, Serialize};

use crate::rules::lexicon::{KNOWN_PAYEES, NOISE_STOP_PHRASES};

/// Environment variable overriding the OCR language.
pub const OCR_LANG_ENV: &str = "OCR_LANG";

/// Main configuration for the boleto pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoletoConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Text-layer quality gate.
    pub quality: QualityConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// External OCR tooling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language (e.g. "por"); engine default when unset.
    pub lang: Option<String>,

    /// DPI for rasterizing PDF pages.
    pub dpi: u32,

    /// Tesseract executable.
    pub tesseract_cmd: String,

    /// Poppler rasterizer executable.
    pub pdftoppm_cmd: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            lang: None,
            dpi: 300,
            tesseract_cmd: "tesseract".to_string(),
            pdftoppm_cmd: "pdftoppm".to_string(),
        }
    }
}

/// Thresholds below which a text layer is considered weak.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Minimum non-whitespace characters.
    pub min_chars: usize,

    /// Minimum whitespace-separated words.
    pub min_words: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_chars: 200,
            min_words: 30,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Payee names accepted as a last resort when nothing else matched.
    pub known_payees: Vec<String>,

    /// Administrative phrases never accepted as a custom keyword value.
    pub stop_phrases: Vec<String>,

    /// Re-run payer fields over OCR text when the text layer missed them.
    pub payer_ocr_retry: bool,

    /// Window size for the windowed keyword strategies.
    pub default_window_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            known_payees: KNOWN_PAYEES.iter().map(|s| s.to_string()).collect(),
            stop_phrases: NOISE_STOP_PHRASES.iter().map(|s| s.to_string()).collect(),
            payer_ocr_retry: true,
            default_window_lines: 3,
        }
    }
}

impl BoletoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Default configuration with process environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `OCR_LANG` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_ocr_lang(std::env::var(OCR_LANG_ENV).ok())
    }

    /// Override the OCR language; blank values are ignored.
    pub fn with_ocr_lang(mut self, lang: Option<String>) -> Self {
        if let Some(lang) = lang.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()) {
            self.ocr.lang = Some(lang);
        }
        self
    }
}
