mod common;

use boleto_core::models::QualityConfig;
use boleto_core::{BoletoError, OcrError, TextAcquirer};
use common::*;
use tempfile::tempdir;

#[test]
fn strong_text_layer_skips_ocr() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "boleto.pdf", &[SLIP_LINES]);
    let ocr = FakeOcr::returning("ocr text");
    let quality = QualityConfig::default();

    let acquired = TextAcquirer::new(&quality, &ocr).acquire(&path, false).unwrap();

    assert!(!acquired.ocr_used);
    assert!(acquired.text.contains("Vencimento: 10/05/2024"));
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn weak_text_layer_goes_to_ocr() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "short.pdf", &[&["Vencimento: 10/05/2024"]]);
    let ocr = FakeOcr::returning(slip_text());
    let quality = QualityConfig::default();

    let acquired = TextAcquirer::new(&quality, &ocr).acquire(&path, false).unwrap();

    assert!(acquired.ocr_used);
    assert_eq!(acquired.text, slip_text());
    assert_eq!(acquired.quality, slip_text().split_whitespace().count());
}

#[test]
fn weak_text_layer_survives_ocr_failure() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "short.pdf", &[&["Vencimento: 10/05/2024"]]);
    let ocr = FakeOcr::unavailable();
    let quality = QualityConfig::default();

    let acquired = TextAcquirer::new(&quality, &ocr).acquire(&path, false).unwrap();

    assert!(!acquired.ocr_used);
    assert!(acquired.text.contains("10/05/2024"));
    assert_eq!(ocr.calls(), 1);
}

#[test]
fn forced_ocr_ignores_strong_text_layer() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "boleto.pdf", &[SLIP_LINES]);
    let ocr = FakeOcr::returning("texto reconhecido");
    let quality = QualityConfig::default();

    let acquired = TextAcquirer::new(&quality, &ocr).acquire(&path, true).unwrap();

    assert!(acquired.ocr_used);
    assert_eq!(acquired.text, "texto reconhecido");
}

#[test]
fn forced_ocr_failure_falls_back_to_text_layer() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), "boleto.pdf", &[SLIP_LINES]);
    let ocr = FakeOcr::empty();
    let quality = QualityConfig::default();

    let acquired = TextAcquirer::new(&quality, &ocr).acquire(&path, true).unwrap();

    assert!(!acquired.ocr_used);
    assert!(acquired.text.contains("Valor do documento"));
}

#[test]
fn no_text_anywhere_is_an_error() {
    let dir = tempdir().unwrap();
    let path = write_scanned_pdf(dir.path(), "scan.pdf");
    let ocr = FakeOcr::empty();
    let quality = QualityConfig::default();

    let err = TextAcquirer::new(&quality, &ocr).acquire(&path, false).unwrap_err();

    assert!(matches!(err, BoletoError::NoText(OcrError::EmptyResult)));
}

#[test]
fn pages_are_joined_in_order() {
    let dir = tempdir().unwrap();
    let first: Vec<&str> = SLIP_LINES[..8].to_vec();
    let second: Vec<&str> = SLIP_LINES[8..].to_vec();
    let path = write_pdf(dir.path(), "two-pages.pdf", &[first.as_slice(), second.as_slice()]);
    let ocr = FakeOcr::empty();
    let quality = QualityConfig::default();

    let acquired = TextAcquirer::new(&quality, &ocr).acquire(&path, false).unwrap();

    let due = acquired.text.find("Vencimento: 10/05/2024").unwrap();
    let value = acquired.text.find("Valor do documento").unwrap();
    assert!(due < value);
    assert!(!acquired.ocr_used);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let ocr = FakeOcr::empty();
    let quality = QualityConfig::default();

    let err = TextAcquirer::new(&quality, &ocr)
        .acquire(&dir.path().join("absent.pdf"), false)
        .unwrap_err();

    assert!(matches!(err, BoletoError::Io(_)));
}
