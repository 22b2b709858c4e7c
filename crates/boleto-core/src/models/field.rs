//! Builtin field keys and value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A builtin field the engine knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    PayeeName,
    PayerName,
    PayeeCnpj,
    PayerCnpj,
    Cpf,
    PayeeAddress,
    PayerAddress,
    DocumentNumber,
    Instructions,
    DueDate,
    IssueDate,
    DocumentValue,
    Barcode,
    Juros,
    Multa,
}

impl FieldKey {
    /// Every builtin field, in presentation order.
    pub const ALL: [FieldKey; 15] = [
        FieldKey::PayeeName,
        FieldKey::PayerName,
        FieldKey::PayeeCnpj,
        FieldKey::PayerCnpj,
        FieldKey::Cpf,
        FieldKey::PayeeAddress,
        FieldKey::PayerAddress,
        FieldKey::DocumentNumber,
        FieldKey::Instructions,
        FieldKey::DueDate,
        FieldKey::IssueDate,
        FieldKey::DocumentValue,
        FieldKey::Barcode,
        FieldKey::Juros,
        FieldKey::Multa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::PayeeName => "payee_name",
            FieldKey::PayerName => "payer_name",
            FieldKey::PayeeCnpj => "payee_cnpj",
            FieldKey::PayerCnpj => "payer_cnpj",
            FieldKey::Cpf => "cpf",
            FieldKey::PayeeAddress => "payee_address",
            FieldKey::PayerAddress => "payer_address",
            FieldKey::DocumentNumber => "document_number",
            FieldKey::Instructions => "instructions",
            FieldKey::DueDate => "due_date",
            FieldKey::IssueDate => "issue_date",
            FieldKey::DocumentValue => "document_value",
            FieldKey::Barcode => "barcode",
            FieldKey::Juros => "juros",
            FieldKey::Multa => "multa",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::PayeeName => "Beneficiário",
            FieldKey::PayerName => "Pagador",
            FieldKey::PayeeCnpj => "CNPJ do beneficiário",
            FieldKey::PayerCnpj => "CNPJ do pagador",
            FieldKey::Cpf => "CPF",
            FieldKey::PayeeAddress => "Endereço do beneficiário",
            FieldKey::PayerAddress => "Endereço do pagador",
            FieldKey::DocumentNumber => "Número do documento",
            FieldKey::Instructions => "Instruções",
            FieldKey::DueDate => "Vencimento",
            FieldKey::IssueDate => "Data de emissão",
            FieldKey::DocumentValue => "Valor do documento",
            FieldKey::Barcode => "Linha digitável",
            FieldKey::Juros => "Juros",
            FieldKey::Multa => "Multa",
        }
    }

    /// Resolve a key, mapping legacy names onto their current field.
    pub fn resolve(key: &str) -> Option<FieldKey> {
        let key = key.trim();
        let canonical = legacy_alias(key).unwrap_or(key);
        FieldKey::ALL.into_iter().find(|f| f.as_str() == canonical)
    }

    /// Value type used for masking and window sub-extraction.
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldKey::PayeeName | FieldKey::PayerName => ValueType::Text,
            FieldKey::PayeeCnpj | FieldKey::PayerCnpj => ValueType::Cnpj,
            FieldKey::Cpf => ValueType::Cpf,
            FieldKey::PayeeAddress | FieldKey::PayerAddress => ValueType::Address,
            FieldKey::DocumentNumber => ValueType::Id,
            FieldKey::Instructions => ValueType::Block,
            FieldKey::DueDate | FieldKey::IssueDate => ValueType::Date,
            FieldKey::DocumentValue | FieldKey::Juros | FieldKey::Multa => ValueType::Money,
            FieldKey::Barcode => ValueType::Barcode,
        }
    }

    /// Fields resolved inside the payer block.
    pub fn is_payer(&self) -> bool {
        self.as_str().starts_with("payer_")
    }

    /// Fields produced by the shared financial pass.
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            FieldKey::DueDate
                | FieldKey::IssueDate
                | FieldKey::DocumentValue
                | FieldKey::Barcode
                | FieldKey::Juros
                | FieldKey::Multa
        )
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::resolve(s).ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Current name for a legacy field key.
pub fn legacy_alias(key: &str) -> Option<&'static str> {
    match key {
        "cnpj" => Some("payee_cnpj"),
        "billing_address" => Some("payer_address"),
        _ => None,
    }
}

/// Kind of value a field or keyword yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Text,
    Block,
    Money,
    Date,
    Cpf,
    Cnpj,
    Id,
    Barcode,
    Address,
    Postal,
}

impl ValueType {
    /// Parse a stored value type; unknown names map to [`ValueType::Text`].
    pub fn parse_lenient(value: &str) -> ValueType {
        match value.trim().to_lowercase().as_str() {
            "block" => ValueType::Block,
            "money" => ValueType::Money,
            "date" => ValueType::Date,
            "cpf" => ValueType::Cpf,
            "cnpj" => ValueType::Cnpj,
            "id" => ValueType::Id,
            "barcode" => ValueType::Barcode,
            "address" => ValueType::Address,
            "postal" => ValueType::Postal,
            _ => ValueType::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Block => "block",
            ValueType::Money => "money",
            ValueType::Date => "date",
            ValueType::Cpf => "cpf",
            ValueType::Cnpj => "cnpj",
            ValueType::Id => "id",
            ValueType::Barcode => "barcode",
            ValueType::Address => "address",
            ValueType::Postal => "postal",
        }
    }

    /// Window size when a keyword does not set `max_lines`.
    pub fn default_window(&self, fallback: usize) -> usize {
        match self {
            ValueType::Block => 6,
            ValueType::Address => 2,
            _ => fallback,
        }
    }
}
