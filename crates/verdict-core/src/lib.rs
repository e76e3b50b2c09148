//! # verdict-core
//!
//! Deterministic eligibility evaluation and explanation engine.
//!
//! This crate answers, for a benefit or loan scenario:
//! - Is the applicant approved, denied, or referred for review?
//! - Which condition decided it, and under which clause?
//! - What would have to change for an approval?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same inputs always produce the same record
//! 2. **Fail fast**: Invalid input is rejected before any rule runs
//! 3. **Traceable**: Every condition is recorded, in precedence order
//! 4. **Render-agnostic**: Records carry plain text, no markup, no timestamps
//!
//! ## Example
//!
//! ```rust,ignore
//! use verdict_core::{evaluate, Outcome, RawInputs};
//!
//! let mut inputs = RawInputs::new();
//! inputs.insert("creditScore".into(), "650".into());
//! inputs.insert("income".into(), "1200000".into());
//! inputs.insert("debt".into(), "15000".into());
//!
//! let record = evaluate("housing_loan", &inputs)?;
//! match record.outcome {
//!     Outcome::Approved => println!("OK: {}", record.explanation),
//!     Outcome::Review => println!("REVIEW: {}", record.key_factor),
//!     Outcome::Denied => println!("DENIED: {}", record.citation.clause),
//! }
//! ```

pub mod catalogue;
pub mod evaluator;
pub mod explain;
pub mod fields;
pub mod registry;
pub mod rules;
pub mod synthesizer;
pub mod types;

// Re-export main types at crate root
pub use catalogue::{Catalogue, CatalogueError, FieldKind, FieldSpec, ScenarioMeta};
pub use evaluator::Evaluator;
pub use fields::{FieldValue, FieldValues, InputIssue};
pub use registry::{Registry, ScenarioDefinition};
pub use rules::RuleSet;
pub use synthesizer::Synthesizer;
pub use types::{
    CheckStatus, DecisionRecord, LegalCitation, Outcome, RawInputs, RuleCheck, ScenarioSummary,
};

use thiserror::Error;

/// Errors that can occur during evaluation
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Unknown scenario: {id}")]
    UnknownScenario { id: String },

    #[error("Invalid input for '{field}': {issue}")]
    InvalidInput { field: String, issue: InputIssue },

    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),
}

impl EvaluationError {
    pub(crate) fn invalid(field: impl Into<String>, issue: InputIssue) -> Self {
        Self::InvalidInput {
            field: field.into(),
            issue,
        }
    }

    /// The offending field, for input errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            EvaluationError::InvalidInput { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

/// Selector entries for every built-in scenario.
pub fn list_scenarios() -> Vec<ScenarioSummary> {
    Registry::builtin().list_scenarios()
}

/// Ordered field schema of a built-in scenario.
pub fn get_fields(scenario_id: &str) -> Result<&'static [FieldSpec], EvaluationError> {
    Registry::builtin().get_fields(scenario_id)
}

/// Evaluation function of a built-in scenario.
pub fn get_evaluator(scenario_id: &str) -> Result<Evaluator<'static>, EvaluationError> {
    Registry::builtin().get_evaluator(scenario_id)
}

/// Evaluate raw inputs against a built-in scenario.
///
/// This is the main entry point for Verdict evaluation.
///
/// # Arguments
///
/// * `scenario_id` - Catalogue id (e.g., `"housing_loan"`)
/// * `inputs` - Field id to raw string, one entry per declared field
///
/// # Returns
///
/// A `DecisionRecord` with the outcome, key factor, trace, counterfactuals,
/// citation and guidance; or `UnknownScenario` / `InvalidInput`.
pub fn evaluate(scenario_id: &str, inputs: &RawInputs) -> Result<DecisionRecord, EvaluationError> {
    get_evaluator(scenario_id)?.evaluate(inputs)
}
