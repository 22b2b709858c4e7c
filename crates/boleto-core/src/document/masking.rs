//! Value masking for field-level log lines.

use crate::models::ValueType;
use crate::text::{compact_alphanumeric, only_digits};

const VISIBLE_TAIL: usize = 4;

fn tail(value: &str) -> &str {
    let start = value
        .char_indices()
        .rev()
        .nth(VISIBLE_TAIL - 1)
        .map_or(0, |(idx, _)| idx);
    &value[start..]
}

/// Loggable form of `value`.
///
/// Identifiers keep their last four characters, payment references their
/// length and last four digits, and free text only its length. Amounts
/// and dates are shown unchanged.
pub fn mask_value(value_type: ValueType, value: &str) -> String {
    match value_type {
        ValueType::Money | ValueType::Date => value.to_string(),
        ValueType::Cpf | ValueType::Cnpj => format!("***{}", tail(&only_digits(value))),
        ValueType::Id => format!("***{}", tail(&compact_alphanumeric(value))),
        ValueType::Barcode => {
            let digits = only_digits(value);
            format!("len={} ...{}", digits.len(), tail(&digits))
        }
        ValueType::Text | ValueType::Block | ValueType::Address | ValueType::Postal => {
            format!("<{} chars>", value.chars().count())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ids_show_last_four() {
        assert_eq!(mask_value(ValueType::Cpf, "529.982.247-25"), "***4725");
        assert_eq!(mask_value(ValueType::Cnpj, "11.222.333/0001-81"), "***0181");
        assert_eq!(mask_value(ValueType::Id, "12345-AB"), "***45AB");
        assert_eq!(mask_value(ValueType::Id, "ab"), "***ab");
    }

    #[test]
    fn test_barcode_length_and_tail() {
        let line = "23790123456000012345678901234567196780000150000";
        assert_eq!(mask_value(ValueType::Barcode, line), "len=47 ...0000");
    }

    #[test]
    fn test_text_length_only() {
        assert_eq!(mask_value(ValueType::Text, "Maria da Silva"), "<14 chars>");
        assert_eq!(mask_value(ValueType::Address, "Rua São João, 1"), "<15 chars>");
    }

    #[test]
    fn test_amounts_and_dates_unmasked() {
        assert_eq!(mask_value(ValueType::Money, "1500.00"), "1500.00");
        assert_eq!(mask_value(ValueType::Date, "2024-05-10"), "2024-05-10");
    }
}
