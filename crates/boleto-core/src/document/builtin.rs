//! Dispatch from builtin field keys to the rule extractors.

use crate::models::FieldKey;
use crate::rules::address::labeled_address;
use crate::rules::labels::labeled_block;
use crate::rules::lexicon::{PAYEE_LABELS, PAYEE_REGISTRATION_ANCHORS, PAYER_LABELS};
use crate::rules::{
    CnpjExtractor, CoreFields, FieldExtractor, extract_address, extract_cnpj, extract_core_fields,
    extract_cpf, extract_document_number, extract_instructions, extract_payee_name,
    extract_payer_name, format_cnpj,
};
use crate::text::{contains_any, non_empty_lines, normalize_for_match};

/// Payer and payee sections of a document.
struct Sections<'a> {
    lines: Vec<&'a str>,
    payer: Option<String>,
    payee: Option<String>,
}

impl<'a> Sections<'a> {
    fn new(text: &'a str) -> Self {
        let lines = non_empty_lines(text);
        let payer = labeled_block(&lines, PAYER_LABELS, PAYEE_LABELS);
        let payee = labeled_block(&lines, PAYEE_LABELS, PAYER_LABELS);
        Self { lines, payer, payee }
    }
}

/// Resolves builtin fields over a text.
pub struct BuiltinExtractor<'a> {
    known_payees: &'a [String],
}

impl<'a> BuiltinExtractor<'a> {
    pub fn new(known_payees: &'a [String]) -> Self {
        Self { known_payees }
    }

    /// Values for `keys` over `text`, in the order given.
    ///
    /// The financial fields share a single pass, run only when one of them
    /// is requested.
    pub fn extract(&self, keys: &[FieldKey], text: &str) -> Vec<(FieldKey, Option<String>)> {
        let core = keys.iter().any(FieldKey::is_core).then(|| extract_core_fields(text));
        let sections = Sections::new(text);

        keys.iter()
            .map(|&key| (key, self.field(key, text, &sections, core.as_ref())))
            .collect()
    }

    fn field(&self, key: FieldKey, text: &str, sections: &Sections<'_>, core: Option<&CoreFields>) -> Option<String> {
        let value = match key {
            FieldKey::PayeeName => extract_payee_name(text, self.known_payees),
            FieldKey::PayerName => sections.payer.as_deref().and_then(extract_payer_name),
            FieldKey::PayeeCnpj => payee_cnpj(text, sections),
            FieldKey::PayerCnpj => sections.payer.as_deref().and_then(extract_cnpj),
            FieldKey::Cpf => extract_cpf(text),
            FieldKey::PayeeAddress => sections
                .payee
                .as_deref()
                .and_then(extract_address)
                .or_else(|| extract_address(text)),
            FieldKey::PayerAddress => sections
                .payer
                .as_deref()
                .and_then(extract_address)
                .or_else(|| labeled_address(&sections.lines)),
            FieldKey::DocumentNumber => extract_document_number(text),
            FieldKey::Instructions => extract_instructions(text),
            FieldKey::DueDate => core.and_then(|c| c.due_date.clone()),
            FieldKey::IssueDate => core.and_then(|c| c.issue_date.clone()),
            FieldKey::DocumentValue => core.and_then(|c| c.document_value.clone()),
            FieldKey::Barcode => core.and_then(|c| c.barcode.clone()),
            FieldKey::Juros => core.and_then(|c| c.juros.clone()),
            FieldKey::Multa => core.and_then(|c| c.multa.clone()),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Payee CNPJ: payee block, then a registration anchor, then the first
/// valid CNPJ that is not the payer's.
fn payee_cnpj(text: &str, sections: &Sections<'_>) -> Option<String> {
    if let Some(cnpj) = sections.payee.as_deref().and_then(extract_cnpj) {
        return Some(cnpj);
    }

    let lines = &sections.lines;
    let anchored = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| contains_any(&normalize_for_match(line), PAYEE_REGISTRATION_ANCHORS))
        .find_map(|(idx, _)| {
            let end = (idx + 2).min(lines.len());
            extract_cnpj(&lines[idx..end].join("\n"))
        });
    if anchored.is_some() {
        return anchored;
    }

    let payer = sections.payer.as_deref().and_then(extract_cnpj);
    CnpjExtractor
        .extract_all(text)
        .into_iter()
        .map(|digits| format_cnpj(&digits))
        .find(|cnpj| payer.as_ref() != Some(cnpj))
}
