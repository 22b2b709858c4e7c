//! Tesseract OCR via the command line.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, trace};

use super::OcrBackend;
use crate::error::OcrError;
use crate::models::OcrConfig;

const TESSERACT_PACKAGE: &str = "tesseract-ocr";
const POPPLER_PACKAGE: &str = "poppler-utils (pdftoppm)";
const PAGE_PREFIX: &str = "page";

/// Rasterizes with `pdftoppm` and recognizes each page with `tesseract`.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    config: OcrConfig,
}

impl TesseractCli {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Render every page to PNG inside `dir`, returning the images in page
    /// order.
    fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
        let output = Command::new(&self.config.pdftoppm_cmd)
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(dir.join(PAGE_PREFIX))
            .output()
            .map_err(|e| OcrError::Conversion(e.to_string()))?;

        if !output.status.success() {
            return Err(OcrError::Conversion(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)
            .map_err(|e| OcrError::Conversion(e.to_string()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .filter_map(|path| page_number(&path).map(|n| (n, path)))
            .collect();
        pages.sort_by_key(|(n, _)| *n);

        if pages.is_empty() {
            return Err(OcrError::Conversion("no page images were produced".to_string()));
        }

        debug!("Rasterized {} pages at {} dpi", pages.len(), self.config.dpi);
        Ok(pages.into_iter().map(|(_, path)| path).collect())
    }

    fn recognize_image(&self, image: &Path) -> Result<String, OcrError> {
        let mut command = Command::new(&self.config.tesseract_cmd);
        command.arg(image).arg("stdout");
        if let Some(lang) = self.config.lang.as_deref() {
            command.arg("-l").arg(lang);
        }

        let output = command
            .output()
            .map_err(|e| OcrError::Recognition(e.to_string()))?;
        if !output.status.success() {
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

/// Page number from a `pdftoppm` output name such as `page-07.png`.
fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.rsplit('-').next()?;
    digits.parse().ok()
}

impl OcrBackend for TesseractCli {
    fn missing_components(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if which::which(&self.config.tesseract_cmd).is_err() {
            missing.push(TESSERACT_PACKAGE.to_string());
        }
        if which::which(&self.config.pdftoppm_cmd).is_err() {
            missing.push(POPPLER_PACKAGE.to_string());
        }
        missing
    }

    fn recognize_pdf(&self, path: &Path) -> Result<String, OcrError> {
        let missing = self.missing_components();
        if !missing.is_empty() {
            return Err(OcrError::Unavailable { missing });
        }

        // Removed on drop, whichever way this returns.
        let workdir = tempfile::tempdir().map_err(|e| OcrError::Conversion(e.to_string()))?;
        let images = self.rasterize(path, workdir.path())?;

        let mut pages = Vec::with_capacity(images.len());
        for image in &images {
            let text = self.recognize_image(image)?;
            trace!("OCR page {}: {} chars", pages.len() + 1, text.len());
            pages.push(text.trim_end().to_string());
        }

        let text = pages.join("\n");
        if text.trim().is_empty() {
            return Err(OcrError::EmptyResult);
        }
        Ok(text)
    }
}
