//! Output payload sanitization.
//!
//! Whatever shape a payload arrives in (current, legacy nested, or with
//! stray diagnostics), [`sanitize`] returns the stable
//! `{document_type, fields, custom_fields}` contract.

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::models::{CustomFieldValue, ExtractionResult, FieldKey};

/// Keys that must never reach a stored payload.
pub const FORBIDDEN_KEYS: &[&str] = &[
    "selected_fields",
    "missing_fields",
    "missing_keywords",
    "raw_text_excerpt",
    "extraction",
    "timing",
    "timings",
    "confidence",
    "anchors",
    "match_strategy",
    "diagnostics",
];

/// Legacy nested objects and the fields their members map to.
const LEGACY_GROUPS: &[(&str, &[(&str, FieldKey)])] = &[
    (
        "dates",
        &[("vencimento", FieldKey::DueDate), ("emissao", FieldKey::IssueDate)],
    ),
    (
        "amounts",
        &[
            ("valor_documento", FieldKey::DocumentValue),
            ("juros", FieldKey::Juros),
            ("multa", FieldKey::Multa),
        ],
    ),
    (
        "barcode",
        &[("linha_digitavel", FieldKey::Barcode), ("codigo_barras", FieldKey::Barcode)],
    ),
];

pub fn is_forbidden_key(key: &str) -> bool {
    FORBIDDEN_KEYS.contains(&key)
}

/// Normalize `payload` into an [`ExtractionResult`].
pub fn sanitize(payload: &Value) -> ExtractionResult {
    let Some(root) = payload.as_object() else {
        error!("payload is not an object, discarding");
        return ExtractionResult::default();
    };

    report_forbidden(root, "payload");

    let mut result = ExtractionResult {
        document_type: root
            .get("document_type")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        ..Default::default()
    };

    if let Some(fields) = root.get("fields").and_then(Value::as_object) {
        report_forbidden(fields, "fields");
        for (key, value) in fields {
            match FieldKey::resolve(key) {
                Some(field) => {
                    result.fields.insert(field.as_str().to_string(), scalar(value));
                }
                None => debug!(key = %key, "dropping unknown field"),
            }
        }
    }

    for (group, members) in LEGACY_GROUPS {
        let Some(nested) = root.get(*group).and_then(Value::as_object) else {
            continue;
        };
        for (member, field) in *members {
            let Some(value) = nested.get(*member).and_then(|v| scalar(v)) else {
                continue;
            };
            let slot = result.fields.entry(field.as_str().to_string()).or_insert(None);
            if slot.is_none() {
                *slot = Some(value);
            }
        }
    }

    for (key, value) in root {
        if value.is_object() || value.is_array() {
            continue;
        }
        if let Some(field) = FieldKey::resolve(key) {
            let slot = result.fields.entry(field.as_str().to_string()).or_insert(None);
            if slot.is_none() {
                *slot = scalar(value);
            }
        }
    }

    if let Some(custom) = root.get("custom_fields").and_then(Value::as_object) {
        for (token, entry) in custom {
            if is_forbidden_key(token) {
                error!(key = %token, "forbidden key in custom fields");
                continue;
            }
            result.custom_fields.insert(token.clone(), custom_value(token, entry));
        }
    }

    result
}

/// Run an already-typed result through [`sanitize`].
pub fn sanitize_result(result: &ExtractionResult) -> ExtractionResult {
    match serde_json::to_value(result) {
        Ok(value) => sanitize(&value),
        Err(e) => {
            error!(error = %e, "result could not be serialized");
            ExtractionResult::default()
        }
    }
}

fn report_forbidden(object: &Map<String, Value>, scope: &str) {
    for key in object.keys().filter(|k| is_forbidden_key(k)) {
        error!(key = %key, scope, "forbidden key in extraction payload");
    }
}

/// String form of a scalar JSON value; containers and null map to `None`.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn custom_value(token: &str, entry: &Value) -> CustomFieldValue {
    match entry {
        Value::Object(map) => CustomFieldValue {
            label: map
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or(token)
                .to_string(),
            value: map.get("value").and_then(scalar),
        },
        other => CustomFieldValue {
            label: token.to_string(),
            value: scalar(other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn all_keys(result: &ExtractionResult) -> Vec<String> {
        result
            .fields
            .keys()
            .chain(result.custom_fields.keys())
            .cloned()
            .collect()
    }

    #[test]
    fn test_current_shape_passes_through() {
        let payload = json!({
            "document_type": "boleto",
            "fields": {"due_date": "2024-05-10", "document_value": "1500.00", "cpf": null},
            "custom_fields": {"kw:3": {"label": "Taxa", "value": "45.90"}},
        });
        let result = sanitize(&payload);

        assert_eq!(result.document_type.as_deref(), Some("boleto"));
        assert_eq!(result.field("due_date"), Some("2024-05-10"));
        assert_eq!(result.fields.get("cpf"), Some(&None));
        assert_eq!(result.custom("kw:3"), Some("45.90"));
        assert_eq!(result.custom_fields["kw:3"].label, "Taxa");
    }

    #[test]
    fn test_legacy_payload_is_migrated() {
        let payload = json!({
            "document_type": "boleto",
            "raw_text_excerpt": "Banco ...",
            "dates": {"vencimento": "2024-05-10", "emissao": null},
            "amounts": {"valor_documento": "1500.00", "juros": "0.50", "multa": null},
            "barcode": {"linha_digitavel": null, "codigo_barras": "2379"},
            "cnpj": "11.222.333/0001-81",
            "billing_address": "Rua A, 1",
            "extraction": {"selected_fields": ["cnpj"], "missing_fields": []},
        });
        let result = sanitize(&payload);

        assert_eq!(result.field("due_date"), Some("2024-05-10"));
        assert_eq!(result.field("document_value"), Some("1500.00"));
        assert_eq!(result.field("juros"), Some("0.50"));
        assert_eq!(result.field("barcode"), Some("2379"));
        assert_eq!(result.field("payee_cnpj"), Some("11.222.333/0001-81"));
        assert_eq!(result.field("payer_address"), Some("Rua A, 1"));
        assert_eq!(result.field("multa"), None);
        assert!(!result.fields.contains_key("cnpj"));
    }

    #[test]
    fn test_structured_fields_win_over_top_level() {
        let payload = json!({
            "fields": {"due_date": "2024-05-10"},
            "due_date": "1999-01-01",
            "dates": {"vencimento": "2000-01-01"},
        });
        assert_eq!(sanitize(&payload).field("due_date"), Some("2024-05-10"));
    }

    #[test]
    fn test_forbidden_keys_never_survive() {
        let payloads = [
            json!({"fields": {"selected_fields": ["x"], "confidence": 0.9, "due_date": "2024-01-01"}}),
            json!({"custom_fields": {"anchors": ["a"], "diagnostics": {}, "kw:1": "v"}, "timings": {}}),
            json!({"missing_fields": [], "match_strategy": "x", "unknown": "y"}),
            json!("not an object"),
            json!({}),
        ];
        for payload in payloads {
            let result = sanitize(&payload);
            for key in all_keys(&result) {
                assert!(!is_forbidden_key(&key), "{key} leaked from {payload}");
            }
            for key in result.fields.keys() {
                assert!(FieldKey::resolve(key).is_some(), "{key} is not builtin");
            }
        }
    }

    #[test]
    fn test_custom_field_scalar_entry() {
        let result = sanitize(&json!({"custom_fields": {"kw:1": "valor"}}));
        assert_eq!(
            result.custom_fields["kw:1"],
            CustomFieldValue {
                label: "kw:1".to_string(),
                value: Some("valor".to_string()),
            }
        );
    }
}
