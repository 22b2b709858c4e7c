//! Rule-based field extractors for Brazilian bank slips and invoices.

pub mod address;
pub mod amounts;
pub mod barcode;
pub mod cnpj;
pub mod cpf;
pub mod dates;
pub mod document_number;
pub mod financial;
pub mod instructions;
pub mod labels;
pub mod lexicon;
pub mod names;
pub mod patterns;
pub mod profile;

pub use address::{extract_address, extract_postal_code};
pub use amounts::{AmountExtractor, amount_by_context, format_amount, normalize_amount, parse_br_amount};
pub use barcode::{PaymentReferences, extract_payment_references};
pub use cnpj::{CnpjExtractor, extract_cnpj, format_cnpj, validate_cnpj};
pub use cpf::{CpfExtractor, extract_cpf, format_cpf, validate_cpf};
pub use dates::{DateExtractor, normalize_date, parse_br_date};
pub use document_number::extract_document_number;
pub use financial::{CoreFields, extract_core_fields};
pub use instructions::extract_instructions;
pub use names::{extract_payee_name, extract_payer_name, looks_like_name};
pub use profile::{extract_age, extract_experience_years, extract_phone};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
