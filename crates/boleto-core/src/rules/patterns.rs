//! Common regex patterns for bank-slip extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Individual registration (CPF): 000.000.000-00 or 11 bare digits
    pub static ref CPF_PATTERN: Regex = Regex::new(
        r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b|\b\d{11}\b"
    ).unwrap();

    // Company registration (CNPJ): 00.000.000/0000-00 or 14 bare digits
    pub static ref CNPJ_PATTERN: Regex = Regex::new(
        r"\b\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}\b|\b\d{14}\b"
    ).unwrap();

    // Dates: DD/MM/YYYY or DD/MM/YY, also with '.' or '-'
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b([0-3]?\d)[./\-]([01]?\d)[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)(data de vencimento|vencimento|vencto|vcto)\D{0,20}([0-3]?\d[./\-][01]?\d[./\-](?:\d{4}|\d{2}))"
    ).unwrap();

    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"(?i)(data de emiss[aã]o|emiss[aã]o)\D{0,20}([0-3]?\d[./\-][01]?\d[./\-](?:\d{4}|\d{2}))"
    ).unwrap();

    // Amounts in Brazilian format: 1.234,56 or 1234,56
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"\b(?:\d{1,3}(?:\.\d{3})+|\d+),\d{2}\b"
    ).unwrap();

    pub static ref DOCUMENT_VALUE: Regex = Regex::new(
        r"(?i)(valor do documento|valor cobrado|valor a pagar|valor|total)\D{0,20}([0-9.]+,[0-9]{2})"
    ).unwrap();

    pub static ref INTEREST: Regex = Regex::new(
        r"(?i)(juros)\D{0,20}([0-9.]+,[0-9]{2})"
    ).unwrap();

    pub static ref PENALTY: Regex = Regex::new(
        r"(?i)(multa)\D{0,20}([0-9.]+,[0-9]{2})"
    ).unwrap();

    // Payment line (linha digitavel), bank format: 47 digits in 5 groups
    pub static ref PAYMENT_LINE_47: Regex = Regex::new(
        r"\b(\d{5})\.(\d{5})\s+(\d{5})\.(\d{6})\s+(\d{5})\.(\d{6})\s+(\d)\s+(\d{14})\b"
    ).unwrap();

    // Payment line, utility/tax format: 48 digits in 4 groups
    pub static ref PAYMENT_LINE_48: Regex = Regex::new(
        r"\b(\d{12})[\s.]+(\d{12})[\s.]+(\d{12})[\s.]+(\d{12})\b"
    ).unwrap();

    // Any 44-48 digit run with single separators in between
    pub static ref DIGIT_RUN: Regex = Regex::new(
        r"(?:\d[\s.\-]?){44,48}"
    ).unwrap();

    // Document number, generic label form
    pub static ref DOCUMENT_NUMBER: Regex = Regex::new(
        r"(?i)(nosso numero|numero do documento|documento)\D{0,10}([0-9A-Z/.\-]{4,})"
    ).unwrap();

    // Document number, ordered label-specific forms
    pub static ref DOCUMENT_NUMBER_LABELS: Vec<Regex> = [
        r"(?i)nosso numero\D{0,10}([0-9A-Z/.\-]{4,})",
        r"(?i)numero do documento\D{0,10}([0-9A-Z/.\-]{4,})",
        r"(?i)documento\D{0,10}([0-9A-Z/.\-]{4,})",
        r"(?i)numero da conta\D{0,10}(\d{6,})",
        r"(?i)no da conta\D{0,10}(\d{6,})",
        r"(?i)cod(?:igo)?\.?\s*debito\s*automatico\D{0,10}(\d{6,})",
        r"(?i)rps\D{0,10}([0-9A-Z/.\-]{4,})",
        r"(?i)nfs-e\D{0,10}([0-9A-Z/.\-]{4,})",
        r"(?i)fatura\D{0,10}([0-9A-Z/.\-]{4,})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    // Company name ending in a legal-form suffix
    pub static ref COMPANY_SUFFIX: Regex = Regex::new(
        r"(?i)\b(\w[\w\s.\-&]{3,}?\s(?:S\.?\s?A\b\.?|S/A\b|LTDA\b\.?|EIRELI\b|MEI\b|ME\b|EPP\b))"
    ).unwrap();

    // Well-known payee printed without a label
    pub static ref KNOWN_COMPANY: Regex = Regex::new(
        r"(?i)\btelefonica brasil\b"
    ).unwrap();

    // Postal code (CEP): 00000-000 or 00.000-000
    pub static ref POSTAL_CODE: Regex = Regex::new(
        r"\b(\d{2})\.?(\d{3})-(\d{3})\b"
    ).unwrap();

    // Age stated inline
    pub static ref AGE_YEARS: Regex = Regex::new(
        r"(\d{1,3})\s*anos"
    ).unwrap();

    // Years of experience, on normalized text
    pub static ref EXPERIENCE_YEARS: Regex = Regex::new(
        r"(\d{1,2})\+?\s*anos?\s*(?:de\s+)?experiencia"
    ).unwrap();

    // Phone number candidates
    pub static ref PHONE: Regex = Regex::new(
        r"\+?\(?\d[\d\s().\-]{8,18}\d"
    ).unwrap();
}
