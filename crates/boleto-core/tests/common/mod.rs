#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use boleto_core::{OcrBackend, OcrError};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

/// A complete boleto text layer.
pub const SLIP_LINES: &[&str] = &[
    "BANCO EXEMPLO S.A. - Ficha de Compensacao",
    "Local de pagamento: Pagavel em qualquer banco ate o vencimento",
    "Beneficiario: ACME Comercio Ltda - CNPJ 11.222.333/0001-81",
    "Pagador: Maria da Silva - CPF 529.982.247-25",
    "Rua das Flores, 100 - Centro - Florianopolis",
    "Numero do documento: 12345-AB",
    "Data de emissao: 02/05/2024",
    "Vencimento: 10/05/2024",
    "Valor do documento: 1.500,00",
    "Instrucoes: apos o vencimento cobrar juros de mora de 0,33 ao dia",
    "Taxa de servico",
    "Referente ao periodo de abril",
    "Conforme contrato",
    "R$ 45,90",
    "23790.12345 60000.123456 78901.234567 1 96780000150000",
];

pub const SLIP_PAYMENT_LINE: &str = "23790123456000012345678901234567196780000150000";

pub fn slip_text() -> String {
    SLIP_LINES.join("\n")
}

/// Build a PDF whose pages carry `pages` as one text object per line.
pub fn text_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 9.into()]));
            operations.push(Operation::new("Td", vec![30.into(), (810 - 12 * i as i64).into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(line.as_bytes().to_vec(), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text_pdf(pages)).unwrap();
    path
}

/// A PDF with one page and no text layer, standing in for a scan.
pub fn write_scanned_pdf(dir: &Path, name: &str) -> PathBuf {
    write_pdf(dir, name, &[&[]])
}

/// OCR backend returning canned text, counting calls.
#[derive(Clone)]
pub struct FakeOcr {
    text: Option<String>,
    missing: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl FakeOcr {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            missing: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self {
            text: None,
            missing: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            text: None,
            missing: vec!["tesseract-ocr".to_string(), "poppler-utils (pdftoppm)".to_string()],
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrBackend for FakeOcr {
    fn missing_components(&self) -> Vec<String> {
        self.missing.clone()
    }

    fn recognize_pdf(&self, _path: &Path) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.missing.is_empty() {
            return Err(OcrError::Unavailable {
                missing: self.missing.clone(),
            });
        }
        self.text.clone().ok_or(OcrError::EmptyResult)
    }
}
