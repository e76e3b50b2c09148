//! Synthesizer: turns evaluated conditions into a decision record.
//!
//! Fixed, non-configurable policy:
//! 1. Conditions are scanned in precedence order
//! 2. The first unmet HARD condition → DENIED
//! 3. The first unmet SOFT condition (if reached first) → REVIEW
//! 4. Nothing unmet → APPROVED
//!
//! Informational conditions never decide. Every condition is traced.

use crate::explain::{self, ALL_CRITERIA};
use crate::rules::{Approval, Condition, Finding, Requirement};
use crate::types::{DecisionRecord, Outcome, RuleCheck};

/// The Synthesizer aggregates conditions into a final record.
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Synthesize conditions into a decision record.
    ///
    /// # Arguments
    ///
    /// * `scenario_id` - Catalogue id of the scenario
    /// * `title` - Scenario title, used in summaries
    /// * `conditions` - Conditions in precedence order
    /// * `approval` - Citation and guidance used when nothing is unmet
    pub fn synthesize(
        &self,
        scenario_id: &str,
        title: &str,
        conditions: &[Condition],
        approval: Approval,
    ) -> DecisionRecord {
        let mut trace: Vec<RuleCheck> = conditions.iter().map(explain::check).collect();
        let notes = self.satisfied_notes(conditions);

        let record = match self.find_deciding(conditions) {
            Some((condition, outcome, finding)) => {
                let mut guidance = finding.guidance.clone();
                guidance.extend(notes);

                DecisionRecord {
                    scenario_id: scenario_id.to_string(),
                    outcome,
                    key_factor: condition.factor.to_string(),
                    explanation: finding.explanation.clone(),
                    trace: Vec::new(),
                    counterfactuals: self.counterfactuals(conditions),
                    citation: finding.citation.clone(),
                    guidance,
                }
            }
            None => {
                let mut guidance = approval.guidance;
                guidance.extend(notes);

                DecisionRecord {
                    scenario_id: scenario_id.to_string(),
                    outcome: Outcome::Approved,
                    key_factor: ALL_CRITERIA.to_string(),
                    explanation: explain::approval_summary(title, conditions.len()),
                    trace: Vec::new(),
                    counterfactuals: Vec::new(),
                    citation: approval.citation,
                    guidance,
                }
            }
        };

        trace.push(explain::final_determination(
            title,
            record.outcome,
            &record.key_factor,
        ));

        DecisionRecord { trace, ..record }
    }

    /// Find the first unmet hard or soft condition.
    fn find_deciding<'a>(
        &self,
        conditions: &'a [Condition],
    ) -> Option<(&'a Condition, Outcome, &'a Finding)> {
        conditions
            .iter()
            .filter(|c| !c.satisfied)
            .find_map(|c| match &c.requirement {
                Requirement::Hard(finding) => Some((c, Outcome::Denied, finding)),
                Requirement::Soft(finding) => Some((c, Outcome::Review, finding)),
                Requirement::Informational { .. } => None,
            })
    }

    /// Counterfactuals of every unmet deciding-capable condition, in
    /// precedence order (so the deciding condition comes first).
    fn counterfactuals(&self, conditions: &[Condition]) -> Vec<String> {
        conditions
            .iter()
            .filter(|c| c.is_blocking())
            .filter_map(|c| c.requirement.finding())
            .flat_map(|finding| finding.counterfactuals.iter().cloned())
            .collect()
    }

    /// Notes of informational conditions that were met.
    fn satisfied_notes(&self, conditions: &[Condition]) -> Vec<String> {
        conditions
            .iter()
            .filter(|c| c.satisfied)
            .filter_map(|c| match &c.requirement {
                Requirement::Informational { note } => Some(note.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}
