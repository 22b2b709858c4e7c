//! Heuristic document type detection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rules::barcode::extract_payment_references;
use crate::text::{contains_any, normalize_for_match};

/// Detected document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Boleto,
    NotaFiscal,
    Fatura,
    Recibo,
    Comprovante,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Boleto => "boleto",
            DocumentType::NotaFiscal => "nota_fiscal",
            DocumentType::Fatura => "fatura",
            DocumentType::Recibo => "recibo",
            DocumentType::Comprovante => "comprovante",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword groups in precedence order.
const KEYWORD_GROUPS: &[(DocumentType, &[&str])] = &[
    (
        DocumentType::Boleto,
        &["boleto", "linha digitavel", "ficha de compensacao", "recibo do pagador", "nosso numero"],
    ),
    (
        DocumentType::NotaFiscal,
        &["nota fiscal", "nf-e", "nfs-e", "danfe", "chave de acesso"],
    ),
    (DocumentType::Fatura, &["fatura", "conta de consumo", "invoice"]),
    (DocumentType::Recibo, &["recibo"]),
    (
        DocumentType::Comprovante,
        &["comprovante", "transferencia realizada", "pix enviado", "pagamento efetuado"],
    ),
];

/// Classify `text`. A payment line or barcode anywhere makes it a boleto;
/// otherwise the first keyword group with a hit decides.
pub fn classify(text: &str) -> Option<DocumentType> {
    if !extract_payment_references(text).is_empty() {
        return Some(DocumentType::Boleto);
    }

    let folded = normalize_for_match(text);
    KEYWORD_GROUPS
        .iter()
        .find(|(_, terms)| contains_any(&folded, *terms))
        .map(|(doc_type, _)| *doc_type)
}
