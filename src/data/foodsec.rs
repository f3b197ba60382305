//! Auxiliary food-security dataset: one scalar per country.
//!
//! The payload is a bare array; each entry carries `value` plus either a
//! `name` or a `code` key field depending on revision. Which one to use is a
//! configuration choice ([`AuxKey`]) rather than a guess.

use serde::Deserialize;
use serde_json::Value;

use crate::data::RowError;
use crate::domain::{AuxKey, AuxRecord};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct RawAuxEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    value: Option<Value>,
}

/// Normalization output for the auxiliary dataset.
#[derive(Debug, Clone)]
pub struct AuxIngest {
    pub records: Vec<AuxRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Parse the dataset body, keying each entry by the configured field.
pub fn parse_aux_dataset(body: &str, key: AuxKey) -> Result<AuxIngest, AppError> {
    let entries: Vec<RawAuxEntry> = serde_json::from_str(body)
        .map_err(|e| AppError::new(4, format!("Invalid auxiliary dataset JSON: {e}")))?;

    let rows_read = entries.len();
    let mut records = Vec::with_capacity(rows_read);
    let mut row_errors = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let field = match key {
            AuxKey::Name => entry.name.as_deref(),
            AuxKey::Code => entry.code.as_deref(),
        };
        let Some(field) = field.map(str::trim).filter(|s| !s.is_empty()) else {
            row_errors.push(RowError {
                index,
                id: entry.name.clone().or_else(|| entry.code.clone()),
                message: format!("missing `{}` field", key_field_name(key)),
            });
            continue;
        };

        let Some(value) = scalar_value(entry.value.as_ref()) else {
            row_errors.push(RowError {
                index,
                id: Some(field.to_string()),
                message: "missing or non-numeric `value`".to_string(),
            });
            continue;
        };

        records.push(AuxRecord {
            key: field.to_string(),
            value,
        });
    }

    Ok(AuxIngest {
        records,
        row_errors,
        rows_read,
    })
}

fn key_field_name(key: AuxKey) -> &'static str {
    match key {
        AuxKey::Name => "name",
        AuxKey::Code => "code",
    }
}

fn scalar_value(value: Option<&Value>) -> Option<f64> {
    let v = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_keyed_entries() {
        let body = r#"[{"name": "Italy", "value": 42}, {"name": "France", "value": "7.5"}]"#;

        let ingest = parse_aux_dataset(body, AuxKey::Name).unwrap();
        assert_eq!(ingest.rows_read, 2);
        assert!(ingest.row_errors.is_empty());
        assert_eq!(ingest.records[0].key, "Italy");
        assert_eq!(ingest.records[0].value, 42.0);
        assert_eq!(ingest.records[1].value, 7.5);
    }

    #[test]
    fn parses_code_keyed_entries() {
        let body = r#"[{"code": "ITA", "value": 42}]"#;

        let ingest = parse_aux_dataset(body, AuxKey::Code).unwrap();
        assert_eq!(ingest.records[0].key, "ITA");
    }

    #[test]
    fn bad_rows_are_reported_not_fatal() {
        let body = r#"[
            {"name": "Italy", "value": 42},
            {"value": 10},
            {"name": "France", "value": "many"}
        ]"#;

        let ingest = parse_aux_dataset(body, AuxKey::Name).unwrap();
        assert_eq!(ingest.records.len(), 1);
        assert_eq!(ingest.row_errors.len(), 2);
        assert_eq!(ingest.row_errors[0].index, 1);
        assert_eq!(ingest.row_errors[1].id.as_deref(), Some("France"));
    }
}
