//! Core types for Verdict evaluations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw form submission: field id to the string the user typed.
///
/// Ordered so that coercion and error reporting never depend on hash order.
pub type RawInputs = BTreeMap<String, String>;

/// Final outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every condition passed
    Approved,

    /// A hard requirement failed
    Denied,

    /// A soft requirement failed; a human must decide
    Review,
}

impl Outcome {
    /// Wording used in the synthesized final trace entry.
    pub fn determination(&self) -> &'static str {
        match self {
            Outcome::Approved => "approved",
            Outcome::Denied => "rejected",
            Outcome::Review => "referred for manual audit",
        }
    }

    /// Trace status that mirrors this outcome.
    pub fn status(&self) -> CheckStatus {
        match self {
            Outcome::Approved => CheckStatus::Pass,
            Outcome::Denied => CheckStatus::Fail,
            Outcome::Review => CheckStatus::Neutral,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Approved => write!(f, "APPROVED"),
            Outcome::Denied => write!(f, "DENIED"),
            Outcome::Review => write!(f, "REVIEW"),
        }
    }
}

/// Status of one evaluated condition in the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Not met, but does not reject outright
    Neutral,
}

/// One evaluated condition, in the uniform shape every scenario produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCheck {
    /// Condition name (e.g., "CIBIL Score")
    pub label: String,

    /// Threshold and recorded value in words
    pub detail: String,

    pub status: CheckStatus,
}

/// Legal clause backing a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalCitation {
    /// Clause text
    pub clause: String,

    /// Instrument the clause belongs to
    pub source: String,

    /// Public reference URL
    pub url: String,
}

impl LegalCitation {
    pub fn new(
        clause: impl Into<String>,
        source: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            clause: clause.into(),
            source: source.into(),
            url: url.into(),
        }
    }
}

/// The result of evaluating one scenario against one set of inputs.
///
/// Contains nothing derived from wall-clock time or randomness, so two
/// evaluations of the same inputs compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub scenario_id: String,

    pub outcome: Outcome,

    /// Name of the condition that decided the outcome
    pub key_factor: String,

    /// Plain-text explanation, free of presentation markup
    pub explanation: String,

    /// Every condition in precedence order, then the final determination
    pub trace: Vec<RuleCheck>,

    /// Input changes that would turn this outcome into an approval
    pub counterfactuals: Vec<String>,

    pub citation: LegalCitation,

    /// Suggested next steps for the applicant
    pub guidance: Vec<String>,
}

impl DecisionRecord {
    /// The trace entry for the deciding condition, if any.
    pub fn deciding_check(&self) -> Option<&RuleCheck> {
        self.trace.iter().find(|check| check.label == self.key_factor)
    }
}

/// Selector entry for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_determination_wording() {
        assert_eq!(Outcome::Approved.determination(), "approved");
        assert_eq!(Outcome::Denied.determination(), "rejected");
        assert_eq!(Outcome::Review.determination(), "referred for manual audit");
    }

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(Outcome::Approved.status(), CheckStatus::Pass);
        assert_eq!(Outcome::Denied.status(), CheckStatus::Fail);
        assert_eq!(Outcome::Review.status(), CheckStatus::Neutral);
    }

    #[test]
    fn test_check_status_serializes_lowercase() {
        let json = serde_json::to_string(&CheckStatus::Neutral).unwrap();
        assert_eq!(json, "\"neutral\"");
    }
}
