//! Education Loan
//!
//! Precedence: confirmed admission (hard), loan amount within the
//! collateral-free limit (soft), then parental income for the interest
//! subsidy. The subsidy check is informational and never changes the outcome.

use crate::explain::{inr, requirement};
use crate::fields::FieldValues;
use crate::types::LegalCitation;
use crate::EvaluationError;

use super::{Approval, Condition, FieldUse, Finding, RuleSet};

/// Largest loan that needs no collateral (INR).
pub const COLLATERAL_FREE_LIMIT: f64 = 750_000.0;
/// Parental income must be strictly below this for the subsidy (INR).
pub const SUBSIDY_INCOME_CEILING: f64 = 450_000.0;

const MODEL_SCHEME: &str = "IBA Model Educational Loan Scheme";
const MODEL_SCHEME_URL: &str = "https://www.iba.org.in";

/// Rule set for the `student_loan` scenario.
pub struct StudentLoanRules;

impl RuleSet for StudentLoanRules {
    fn scenario_id(&self) -> &'static str {
        "student_loan"
    }

    fn reads(&self) -> &'static [(&'static str, FieldUse)] {
        &[
            ("admission", FieldUse::Choice),
            ("fees", FieldUse::Number),
            ("parentIncome", FieldUse::Number),
        ]
    }

    fn conditions(&self, values: &FieldValues) -> Result<Vec<Condition>, EvaluationError> {
        let admission = values.choice("admission")?;
        let fees = values.number("fees")?;
        let parent_income = values.number("parentIncome")?;

        Ok(vec![
            admission_condition(admission),
            collateral_condition(fees),
            subsidy_condition(parent_income),
        ])
    }

    fn approval(&self) -> Approval {
        Approval {
            guidance: vec![
                "Submit the admission letter, fee schedule and KYC documents of student and co-borrower."
                    .to_string(),
                "Fees are disbursed directly to the institution in instalments.".to_string(),
            ],
            citation: LegalCitation::new(
                "Clause 5: Loans up to the collateral-free limit are sanctioned against the parent or guardian as co-borrower.",
                MODEL_SCHEME,
                MODEL_SCHEME_URL,
            ),
        }
    }
}

fn admission_condition(admission: &str) -> Condition {
    Condition::hard(
        "Admission Status",
        admission == "Yes",
        requirement("confirmed admission", admission),
        Finding {
            explanation: "Education loans are sanctioned only against a confirmed admission, \
                          and no confirmed admission was declared."
                .to_string(),
            guidance: vec![
                "Reapply once you hold an admission or offer letter from the institution.".to_string(),
            ],
            citation: LegalCitation::new(
                "Clause 2: The student should have secured admission to a recognised course through an entrance test or merit-based selection.",
                MODEL_SCHEME,
                MODEL_SCHEME_URL,
            ),
            counterfactuals: vec!["Admission to the course is confirmed".to_string()],
        },
    )
}

fn collateral_condition(fees: f64) -> Condition {
    Condition::soft(
        "Loan Amount / Collateral",
        fees <= COLLATERAL_FREE_LIMIT,
        requirement(
            format!("at most {} without collateral", inr(COLLATERAL_FREE_LIMIT)),
            inr(fees),
        ),
        Finding {
            explanation: format!(
                "Course fees of {} exceed the {} limit for collateral-free education loans. \
                 The application is referred for manual review of collateral or a third-party guarantee.",
                inr(fees),
                inr(COLLATERAL_FREE_LIMIT)
            ),
            guidance: vec![
                "Keep property papers or fixed deposit receipts ready as tangible collateral.".to_string(),
                "A loan officer will assess collateral value before sanction.".to_string(),
            ],
            citation: LegalCitation::new(
                "Loans up to ₹7.5 lakh are covered without collateral; higher amounts require tangible collateral security.",
                "Credit Guarantee Fund Scheme for Education Loans (CGFSEL)",
                "https://www.ncgtc.in/en/product-details/CGFSEL",
            ),
            counterfactuals: vec![format!(
                "The loan amount is {} or less",
                inr(COLLATERAL_FREE_LIMIT)
            )],
        },
    )
}

fn subsidy_condition(parent_income: f64) -> Condition {
    Condition::informational(
        "Interest Subsidy",
        parent_income < SUBSIDY_INCOME_CEILING,
        requirement(
            format!("parental income below {}", inr(SUBSIDY_INCOME_CEILING)),
            inr(parent_income),
        ),
        format!(
            "Parental income below {} qualifies for full interest subsidy during the moratorium period \
             under the Central Sector Interest Subsidy scheme.",
            inr(SUBSIDY_INCOME_CEILING)
        ),
    )
}
