//! Collecting raw form inputs from the command line, files and JSON bodies.
//!
//! Everything ends up as field id -> string; coercion happens in the core.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use thiserror::Error;
use verdict_core::RawInputs;

/// A submitted value that is neither a string nor a number.
#[derive(Error, Debug, PartialEq)]
#[error("field '{field}' must be a string or a number")]
pub struct UnsupportedValue {
    pub field: String,
}

/// Convert a JSON object of field values into raw inputs.
///
/// Numbers are accepted as a convenience for API clients and are rendered
/// back to their textual form.
pub fn from_json_map(map: BTreeMap<String, Value>) -> Result<RawInputs, UnsupportedValue> {
    map.into_iter()
        .map(|(field, value)| match value {
            Value::String(text) => Ok((field, text)),
            Value::Number(number) => Ok((field, number.to_string())),
            _ => Err(UnsupportedValue { field }),
        })
        .collect()
}

/// Parse `field=value` assignments.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got {raw:?}")),
    }
}

/// Load inputs from a JSON or YAML file (chosen by extension).
pub fn from_file(path: &Path) -> Result<RawInputs> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read inputs from {}", path.display()))?;

    let map: BTreeMap<String, Value> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&contents)
            .with_context(|| format!("{} is not a JSON object", path.display()))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("{} is not a YAML mapping", path.display()))?,
        other => bail!(
            "unsupported input file extension {:?}; use .json, .yaml or .yml",
            other.unwrap_or("")
        ),
    };

    Ok(from_json_map(map)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_numbers_become_text() {
        let map: BTreeMap<String, Value> = serde_json::from_value(json!({
            "creditScore": 750,
            "income": "1200000",
            "debt": 15000.5
        }))
        .unwrap();

        let raw = from_json_map(map).unwrap();
        assert_eq!(raw["creditScore"], "750");
        assert_eq!(raw["income"], "1200000");
        assert_eq!(raw["debt"], "15000.5");
    }

    #[test]
    fn test_json_booleans_rejected() {
        let map: BTreeMap<String, Value> =
            serde_json::from_value(json!({ "admission": true })).unwrap();
        assert_eq!(
            from_json_map(map),
            Err(UnsupportedValue {
                field: "admission".to_string()
            })
        );
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("sector=Retail"),
            Ok(("sector".to_string(), "Retail".to_string()))
        );
        assert_eq!(
            parse_assignment("fees=9,00,000"),
            Ok(("fees".to_string(), "9,00,000".to_string()))
        );
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("=5").is_err());
    }
}
