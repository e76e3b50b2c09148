//! Catalogue parsing from YAML.
//!
//! A catalogue document is checked against `spec/catalogue.schema.json`
//! before it is deserialized, so malformed field kinds are reported with
//! their location instead of as a serde error.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CATALOGUE_SCHEMA: &str = include_str!("../../../../spec/catalogue.schema.json");

lazy_static! {
    static ref SCENARIO_ID: Regex = Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
    static ref FIELD_ID: Regex = Regex::new(r"^[a-z][A-Za-z0-9]*$").unwrap();
    static ref CATALOGUE_VALIDATOR: Result<jsonschema::Validator, String> =
        compile_catalogue_schema();
}

fn compile_catalogue_schema() -> Result<jsonschema::Validator, String> {
    let schema: serde_json::Value = serde_json::from_str(CATALOGUE_SCHEMA)
        .map_err(|e| format!("catalogue schema is not valid JSON: {e}"))?;
    jsonschema::options()
        .build(&schema)
        .map_err(|e| format!("catalogue schema does not compile: {e}"))
}

/// Every schema violation in a catalogue document, prefixed with its path.
fn schema_violations(document: &serde_json::Value) -> Result<Vec<String>, CatalogueError> {
    let validator = CATALOGUE_VALIDATOR
        .as_ref()
        .map_err(|e| CatalogueError::SchemaUnavailable(e.clone()))?;

    Ok(validator
        .iter_errors(document)
        .map(|violation| {
            let path = violation.instance_path.to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            format!("{path}: {violation}")
        })
        .collect())
}

/// Errors that can occur when loading a scenario catalogue.
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Catalogue schema unavailable: {0}")]
    SchemaUnavailable(String),

    #[error("Catalogue does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Failed to read catalogue document: {0}")]
    DocumentError(#[from] serde_json::Error),

    #[error("Catalogue validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Scenario '{0}' has no rule set")]
    UnboundRuleSet(String),

    #[error("Rule set for '{scenario}' reads undeclared field '{field}'")]
    UndeclaredField { scenario: String, field: String },
}

/// Input kind of a form field, with its own validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free numeric entry, optionally bounded
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },

    /// One of a fixed, ordered set of options
    Enum { options: Vec<String> },
}

/// One input on a scenario form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Form field name; unique within a scenario
    pub id: String,

    pub label: String,

    #[serde(flatten)]
    pub kind: FieldKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldSpec {
    /// Allowed options for enum fields; empty for numeric ones.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Enum { options } => options,
            FieldKind::Number { .. } => &[],
        }
    }
}

/// Display metadata and input schema for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub id: String,
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldSpec>,
}

impl ScenarioMeta {
    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// The scenario catalogue: ordered list of scenario metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalogue {
    /// Version of this catalogue (semver-ish)
    pub catalogue_version: String,

    pub scenarios: Vec<ScenarioMeta>,
}

impl Catalogue {
    /// Parse a catalogue from YAML, checking it against the catalogue schema
    /// before deserializing.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogueError> {
        let document: serde_json::Value = serde_yaml::from_str(yaml)?;

        let violations = schema_violations(&document)?;
        if !violations.is_empty() {
            return Err(CatalogueError::SchemaError(violations));
        }

        let catalogue: Catalogue = serde_json::from_value(document)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Validate the catalogue structure.
    fn validate(&self) -> Result<(), CatalogueError> {
        if self.scenarios.is_empty() {
            return Err(CatalogueError::MissingField("scenarios".to_string()));
        }

        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if !SCENARIO_ID.is_match(&scenario.id) {
                return Err(CatalogueError::ValidationError(format!(
                    "Invalid scenario id: {:?}",
                    scenario.id
                )));
            }
            if !seen.insert(scenario.id.as_str()) {
                return Err(CatalogueError::ValidationError(format!(
                    "Duplicate scenario id: {}",
                    scenario.id
                )));
            }
            if scenario.title.trim().is_empty() {
                return Err(CatalogueError::MissingField(format!(
                    "{}.title",
                    scenario.id
                )));
            }
            if scenario.fields.is_empty() {
                return Err(CatalogueError::MissingField(format!(
                    "{}.fields",
                    scenario.id
                )));
            }
            validate_fields(scenario)?;
        }

        Ok(())
    }

    pub fn scenario(&self, id: &str) -> Option<&ScenarioMeta> {
        self.scenarios.iter().find(|s| s.id == id)
    }
}

fn validate_fields(scenario: &ScenarioMeta) -> Result<(), CatalogueError> {
    let mut seen = HashSet::new();

    for field in &scenario.fields {
        if !FIELD_ID.is_match(&field.id) {
            return Err(CatalogueError::ValidationError(format!(
                "Invalid field id in {}: {:?}",
                scenario.id, field.id
            )));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(CatalogueError::ValidationError(format!(
                "Duplicate field id in {}: {}",
                scenario.id, field.id
            )));
        }

        match &field.kind {
            FieldKind::Number {
                min: Some(min),
                max: Some(max),
            } if min > max => {
                return Err(CatalogueError::ValidationError(format!(
                    "Field {}.{} has min {} above max {}",
                    scenario.id, field.id, min, max
                )));
            }
            FieldKind::Enum { options } if options.is_empty() => {
                return Err(CatalogueError::MissingField(format!(
                    "{}.{}.options",
                    scenario.id, field.id
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CATALOGUE: &str = r#"
catalogue_version: "1.0"
scenarios:
  - id: demo
    title: "Demo"
    description: "Demo scenario"
    fields:
      - id: amount
        label: "Amount"
        kind: number
        min: 0
        max: 10
      - id: colour
        label: "Colour"
        kind: enum
        options: [Red, Blue]
"#;

    #[test]
    fn test_parse_valid_catalogue() {
        let catalogue = Catalogue::from_yaml(VALID_CATALOGUE).unwrap();
        let demo = catalogue.scenario("demo").unwrap();
        assert_eq!(demo.fields.len(), 2);
        assert_eq!(
            demo.field("amount").unwrap().kind,
            FieldKind::Number {
                min: Some(0.0),
                max: Some(10.0)
            }
        );
        assert_eq!(demo.field("colour").unwrap().options(), ["Red", "Blue"]);
    }

    #[test]
    fn test_duplicate_field_ids() {
        let yaml = r#"
catalogue_version: "1.0"
scenarios:
  - id: demo
    title: "Demo"
    description: ""
    fields:
      - id: amount
        label: "Amount"
        kind: number
      - id: amount
        label: "Amount again"
        kind: number
"#;
        let result = Catalogue::from_yaml(yaml);
        assert!(matches!(result, Err(CatalogueError::ValidationError(_))));
    }

    #[test]
    fn test_duplicate_scenario_ids() {
        let yaml = r#"
catalogue_version: "1.0"
scenarios:
  - id: demo
    title: "Demo"
    description: ""
    fields:
      - { id: amount, label: "Amount", kind: number }
  - id: demo
    title: "Demo 2"
    description: ""
    fields:
      - { id: amount, label: "Amount", kind: number }
"#;
        let result = Catalogue::from_yaml(yaml);
        assert!(matches!(result, Err(CatalogueError::ValidationError(_))));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let yaml = r#"
catalogue_version: "1.0"
scenarios:
  - id: demo
    title: "Demo"
    description: ""
    fields:
      - { id: amount, label: "Amount", kind: number, min: 10, max: 1 }
"#;
        let result = Catalogue::from_yaml(yaml);
        assert!(matches!(result, Err(CatalogueError::ValidationError(_))));
    }

    #[test]
    fn test_enum_without_options_fails_schema() {
        let yaml = r#"
catalogue_version: "1.0"
scenarios:
  - id: demo
    title: "Demo"
    description: ""
    fields:
      - { id: colour, label: "Colour", kind: enum }
"#;
        let result = Catalogue::from_yaml(yaml);
        assert!(matches!(result, Err(CatalogueError::SchemaError(_))));
    }

    fn demo_document(fields: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "catalogue_version": "1.0",
            "scenarios": [{
                "id": "demo",
                "title": "Demo",
                "description": "",
                "fields": fields
            }]
        })
    }

    #[test]
    fn test_schema_accepts_both_kinds() {
        let document = demo_document(serde_json::json!([
            { "id": "amount", "label": "Amount", "kind": "number", "min": 0 },
            { "id": "colour", "label": "Colour", "kind": "enum", "options": ["Red"] }
        ]));
        assert!(schema_violations(&document).unwrap().is_empty());
    }

    #[test]
    fn test_schema_requires_scenarios() {
        let document = serde_json::json!({ "catalogue_version": "1.0" });
        assert!(!schema_violations(&document).unwrap().is_empty());
    }

    #[test]
    fn test_schema_rejects_kind_specific_mistakes() {
        let cases = [
            serde_json::json!([{ "id": "when", "label": "When", "kind": "date" }]),
            serde_json::json!([{ "id": "amount", "label": "Amount", "kind": "number", "options": ["1"] }]),
            serde_json::json!([{ "id": "colour", "label": "Colour", "kind": "enum", "options": ["Red"], "max": 3 }]),
            serde_json::json!([{ "id": "Amount-1", "label": "Amount", "kind": "number" }]),
        ];
        for fields in cases {
            let document = demo_document(fields.clone());
            assert!(
                !schema_violations(&document).unwrap().is_empty(),
                "expected violations for {fields}"
            );
        }
    }

    #[test]
    fn test_schema_violations_carry_location() {
        let document = demo_document(serde_json::json!([
            { "id": "amount", "label": "Amount", "kind": "number", "threshold": 10 }
        ]));
        let violations = schema_violations(&document).unwrap();
        assert!(violations.iter().any(|v| v.starts_with("/scenarios/0/fields/0")));
    }
}
