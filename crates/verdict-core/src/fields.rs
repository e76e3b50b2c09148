//! Input coercion.
//!
//! Raw form strings are coerced against the scenario's field schema before any
//! rule runs. A field that cannot be coerced stops the evaluation; nothing
//! invalid ever reaches a comparison.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalogue::{FieldKind, FieldSpec, ScenarioMeta};
use crate::types::RawInputs;
use crate::EvaluationError;

/// Why a single field was rejected.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum InputIssue {
    #[error("a value is required")]
    Missing,

    #[error("{value:?} is not a number")]
    NotANumber { value: String },

    #[error("value must be a finite number")]
    NotFinite,

    #[error("{value} is below the minimum of {min}")]
    BelowMinimum { value: f64, min: f64 },

    #[error("{value} is above the maximum of {max}")]
    AboveMaximum { value: f64, max: f64 },

    #[error("{value:?} is not one of: {}", .allowed.join(", "))]
    NotAnOption { value: String, allowed: Vec<String> },

    /// The field is declared with a different kind than the one read
    #[error("field is declared as {declared}, not {expected}")]
    KindMismatch {
        declared: &'static str,
        expected: &'static str,
    },

    /// The value is well-formed but makes a derived quantity undefined
    #[error("{reason}")]
    Degenerate { reason: String },
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Always finite and within the declared bounds
    Number(f64),

    /// Always one of the declared options
    Choice(String),
}

/// Coerced inputs for one scenario, keyed by field id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldValues {
    values: BTreeMap<String, FieldValue>,
}

impl FieldValues {
    /// Numeric value of a declared number field.
    pub fn number(&self, id: &str) -> Result<f64, EvaluationError> {
        match self.values.get(id) {
            Some(FieldValue::Number(n)) => Ok(*n),
            Some(FieldValue::Choice(_)) => Err(EvaluationError::invalid(
                id,
                InputIssue::KindMismatch {
                    declared: "enum",
                    expected: "number",
                },
            )),
            None => Err(EvaluationError::invalid(id, InputIssue::Missing)),
        }
    }

    /// Selected option of a declared enum field.
    pub fn choice(&self, id: &str) -> Result<&str, EvaluationError> {
        match self.values.get(id) {
            Some(FieldValue::Choice(value)) => Ok(value.as_str()),
            Some(FieldValue::Number(_)) => Err(EvaluationError::invalid(
                id,
                InputIssue::KindMismatch {
                    declared: "number",
                    expected: "enum",
                },
            )),
            None => Err(EvaluationError::invalid(id, InputIssue::Missing)),
        }
    }
}

impl FieldSpec {
    /// Coerce one raw string according to this field's kind.
    pub fn coerce(&self, raw: Option<&str>) -> Result<FieldValue, InputIssue> {
        let text = raw.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(InputIssue::Missing);
        }

        match &self.kind {
            FieldKind::Number { min, max } => {
                let value = parse_number(text)?;
                if let Some(min) = min {
                    if value < *min {
                        return Err(InputIssue::BelowMinimum { value, min: *min });
                    }
                }
                if let Some(max) = max {
                    if value > *max {
                        return Err(InputIssue::AboveMaximum { value, max: *max });
                    }
                }
                Ok(FieldValue::Number(value))
            }
            FieldKind::Enum { options } => {
                if options.iter().any(|option| option == text) {
                    Ok(FieldValue::Choice(text.to_string()))
                } else {
                    Err(InputIssue::NotAnOption {
                        value: text.to_string(),
                        allowed: options.clone(),
                    })
                }
            }
        }
    }
}

/// Parse a numeric entry. Digit-group commas ("12,00,000") are accepted.
fn parse_number(text: &str) -> Result<f64, InputIssue> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().map_err(|_| InputIssue::NotANumber {
        value: text.to_string(),
    })?;

    if !value.is_finite() {
        return Err(InputIssue::NotFinite);
    }
    Ok(value)
}

/// Coerce every declared field of a scenario, in schema order.
///
/// The first field that fails is reported. Inputs for undeclared ids are
/// ignored.
pub fn coerce_inputs(meta: &ScenarioMeta, raw: &RawInputs) -> Result<FieldValues, EvaluationError> {
    for key in raw.keys() {
        if meta.field(key).is_none() {
            debug!(scenario = %meta.id, field = %key, "ignoring undeclared input");
        }
    }

    let mut values = BTreeMap::new();
    for field in &meta.fields {
        let value = field
            .coerce(raw.get(&field.id).map(String::as_str))
            .map_err(|issue| EvaluationError::invalid(&field.id, issue))?;
        values.insert(field.id.clone(), value);
    }

    debug!(scenario = %meta.id, fields = values.len(), "inputs coerced");
    Ok(FieldValues { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_field(min: Option<f64>, max: Option<f64>) -> FieldSpec {
        FieldSpec {
            id: "amount".to_string(),
            label: "Amount".to_string(),
            kind: FieldKind::Number { min, max },
            placeholder: None,
        }
    }

    fn enum_field() -> FieldSpec {
        FieldSpec {
            id: "answer".to_string(),
            label: "Answer".to_string(),
            kind: FieldKind::Enum {
                options: vec!["Yes".to_string(), "No".to_string()],
            },
            placeholder: None,
        }
    }

    #[test]
    fn test_number_parses_with_whitespace_and_commas() {
        let field = number_field(None, None);
        assert_eq!(field.coerce(Some(" 42.5 ")), Ok(FieldValue::Number(42.5)));
        assert_eq!(field.coerce(Some("12,00,000")), Ok(FieldValue::Number(1_200_000.0)));
    }

    #[test]
    fn test_blank_is_missing() {
        let field = number_field(None, None);
        assert_eq!(field.coerce(None), Err(InputIssue::Missing));
        assert_eq!(field.coerce(Some("   ")), Err(InputIssue::Missing));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let field = number_field(None, None);
        assert!(matches!(
            field.coerce(Some("abc")),
            Err(InputIssue::NotANumber { .. })
        ));
    }

    #[test]
    fn test_nan_and_infinity_rejected() {
        let field = number_field(None, None);
        assert_eq!(field.coerce(Some("NaN")), Err(InputIssue::NotFinite));
        assert_eq!(field.coerce(Some("inf")), Err(InputIssue::NotFinite));
        assert_eq!(field.coerce(Some("-infinity")), Err(InputIssue::NotFinite));
    }

    #[test]
    fn test_bounds_enforced_inclusively() {
        let field = number_field(Some(300.0), Some(900.0));
        assert_eq!(field.coerce(Some("300")), Ok(FieldValue::Number(300.0)));
        assert_eq!(field.coerce(Some("900")), Ok(FieldValue::Number(900.0)));
        assert!(matches!(
            field.coerce(Some("299")),
            Err(InputIssue::BelowMinimum { .. })
        ));
        assert!(matches!(
            field.coerce(Some("901")),
            Err(InputIssue::AboveMaximum { .. })
        ));
    }

    #[test]
    fn test_enum_requires_exact_option() {
        let field = enum_field();
        assert_eq!(
            field.coerce(Some("Yes")),
            Ok(FieldValue::Choice("Yes".to_string()))
        );
        assert!(matches!(
            field.coerce(Some("yes")),
            Err(InputIssue::NotAnOption { .. })
        ));
    }

    #[test]
    fn test_issue_messages_name_the_problem() {
        let issue = InputIssue::NotAnOption {
            value: "Maybe".to_string(),
            allowed: vec!["Yes".to_string(), "No".to_string()],
        };
        assert_eq!(issue.to_string(), "\"Maybe\" is not one of: Yes, No");
    }

    #[test]
    fn test_coerce_inputs_reports_first_bad_field_in_schema_order() {
        let meta = ScenarioMeta {
            id: "demo".to_string(),
            title: "Demo".to_string(),
            description: String::new(),
            fields: vec![number_field(None, None), enum_field()],
        };
        let mut raw = RawInputs::new();
        raw.insert("answer".to_string(), "Perhaps".to_string());

        match coerce_inputs(&meta, &raw) {
            Err(EvaluationError::InvalidInput { field, issue }) => {
                assert_eq!(field, "amount");
                assert_eq!(issue, InputIssue::Missing);
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_inputs_ignores_undeclared() {
        let meta = ScenarioMeta {
            id: "demo".to_string(),
            title: "Demo".to_string(),
            description: String::new(),
            fields: vec![number_field(None, None)],
        };
        let mut raw = RawInputs::new();
        raw.insert("amount".to_string(), "7".to_string());
        raw.insert("extra".to_string(), "ignored".to_string());

        let values = coerce_inputs(&meta, &raw).unwrap();
        assert_eq!(values.number("amount").unwrap(), 7.0);
        assert_eq!(values.number("extra").unwrap_err().field(), Some("extra"));
    }

    #[test]
    fn test_reading_wrong_kind_reports_mismatch() {
        let meta = ScenarioMeta {
            id: "demo".to_string(),
            title: "Demo".to_string(),
            description: String::new(),
            fields: vec![number_field(None, None), enum_field()],
        };
        let mut raw = RawInputs::new();
        raw.insert("amount".to_string(), "7".to_string());
        raw.insert("answer".to_string(), "Yes".to_string());
        let values = coerce_inputs(&meta, &raw).unwrap();

        match values.choice("amount") {
            Err(EvaluationError::InvalidInput { field, issue }) => {
                assert_eq!(field, "amount");
                assert_eq!(
                    issue,
                    InputIssue::KindMismatch {
                        declared: "number",
                        expected: "enum"
                    }
                );
            }
            other => panic!("expected kind mismatch, got {:?}", other),
        }

        let err = values.number("answer").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input for 'answer': field is declared as enum, not number"
        );
        assert!(matches!(
            values.choice("missing"),
            Err(EvaluationError::InvalidInput {
                issue: InputIssue::Missing,
                ..
            })
        ));
    }
}
