//! Merit-cum-Means Scholarship
//!
//! Precedence: academic percentage, then family income. Both are hard.

use crate::explain::{inr, quantity, requirement};
use crate::fields::FieldValues;
use crate::types::LegalCitation;
use crate::EvaluationError;

use super::{Approval, Condition, FieldUse, Finding, RuleSet};

pub const MIN_PERCENTAGE: f64 = 80.0;
/// Family income must be strictly below this (INR).
pub const INCOME_CEILING: f64 = 800_000.0;

const GUIDELINES: &str = "Central Sector Scholarship Scheme Guidelines";
const GUIDELINES_URL: &str = "https://scholarships.gov.in";

/// Rule set for the `scholarship` scenario.
pub struct ScholarshipRules;

impl RuleSet for ScholarshipRules {
    fn scenario_id(&self) -> &'static str {
        "scholarship"
    }

    fn reads(&self) -> &'static [(&'static str, FieldUse)] {
        &[("percentage", FieldUse::Number), ("income", FieldUse::Number)]
    }

    fn conditions(&self, values: &FieldValues) -> Result<Vec<Condition>, EvaluationError> {
        let percentage = values.number("percentage")?;
        let income = values.number("income")?;

        Ok(vec![merit_condition(percentage), means_condition(income)])
    }

    fn approval(&self) -> Approval {
        Approval {
            guidance: vec![
                "Register on the National Scholarship Portal and upload your mark sheet and income certificate."
                    .to_string(),
                "Renewal each year requires at least 50% marks and 75% attendance.".to_string(),
            ],
            citation: LegalCitation::new(
                "Para 3: Scholarships are awarded to students above the 80th percentile whose family income is below ₹8 lakh per annum.",
                GUIDELINES,
                GUIDELINES_URL,
            ),
        }
    }
}

fn merit_condition(percentage: f64) -> Condition {
    Condition::hard(
        "Academic Percentage",
        percentage >= MIN_PERCENTAGE,
        requirement(
            format!("at least {}%", quantity(MIN_PERCENTAGE)),
            format!("{}%", quantity(percentage)),
        ),
        Finding {
            explanation: format!(
                "A score of {}% is below the {}% merit threshold for this scholarship.",
                quantity(percentage),
                quantity(MIN_PERCENTAGE)
            ),
            guidance: vec![
                "State merit scholarships with lower cut-offs may still be available.".to_string(),
            ],
            citation: LegalCitation::new(
                "Para 3.1: Candidates must have secured at least 80% in the qualifying examination.",
                GUIDELINES,
                GUIDELINES_URL,
            ),
            counterfactuals: vec![format!(
                "The qualifying exam percentage is {}% or higher",
                quantity(MIN_PERCENTAGE)
            )],
        },
    )
}

fn means_condition(income: f64) -> Condition {
    Condition::hard(
        "Family Income",
        income < INCOME_CEILING,
        requirement(format!("below {}", inr(INCOME_CEILING)), inr(income)),
        Finding {
            explanation: format!(
                "Annual family income of {} is at or above the {} ceiling for this means-based scholarship.",
                inr(income),
                inr(INCOME_CEILING)
            ),
            guidance: vec![
                "Merit-only awards without an income ceiling are listed on the National Scholarship Portal."
                    .to_string(),
            ],
            citation: LegalCitation::new(
                "Para 3.2: Gross parental or family income must be less than ₹8 lakh per annum.",
                GUIDELINES,
                GUIDELINES_URL,
            ),
            counterfactuals: vec![format!(
                "Annual family income is below {}",
                inr(INCOME_CEILING)
            )],
        },
    )
}
