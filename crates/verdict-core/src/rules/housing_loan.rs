//! Home Loan Pre-Approval
//!
//! Precedence: bureau score, then debt-to-income. DTI is monthly EMIs over
//! monthly income (annual income / 12), as a percentage.

use crate::explain::{inr, percent, quantity, requirement};
use crate::fields::{FieldValues, InputIssue};
use crate::types::LegalCitation;
use crate::EvaluationError;

use super::{Approval, Condition, FieldUse, Finding, RuleSet};

pub const MIN_CREDIT_SCORE: f64 = 700.0;
/// DTI must not exceed this percentage.
pub const MAX_DTI: f64 = 40.0;

const POLICY: &str = "Housing Finance Credit Policy";
const POLICY_URL: &str = "https://www.rbi.org.in/Scripts/BS_ViewMasCirculardetails.aspx";

/// Debt-to-income ratio in percent.
///
/// Computed as `debt * 1200 / income`, which equals
/// `debt / (income / 12) * 100` with a single rounding step, so a ratio of
/// exactly 40 compares as exactly 40. A ratio that overflows is reported
/// against the field that drove it, never compared.
pub fn debt_to_income(monthly_debt: f64, annual_income: f64) -> Result<f64, EvaluationError> {
    if annual_income <= 0.0 {
        return Err(degenerate(
            "income",
            "annual income must be greater than zero to compute the debt-to-income ratio",
        ));
    }

    let annual_debt = monthly_debt * 1200.0;
    if !annual_debt.is_finite() {
        return Err(degenerate(
            "debt",
            "monthly EMIs are too large to compute the debt-to-income ratio",
        ));
    }

    let ratio = annual_debt / annual_income;
    if !ratio.is_finite() {
        return Err(degenerate(
            "income",
            "annual income is too small to compute the debt-to-income ratio",
        ));
    }
    Ok(ratio)
}

/// Largest monthly EMI and smallest annual income that meet the DTI limit.
fn repayment_levers(monthly_debt: f64, annual_income: f64) -> Result<(f64, f64), EvaluationError> {
    let max_debt = annual_income / 12.0 * MAX_DTI / 100.0;
    if !max_debt.is_finite() {
        return Err(degenerate("income", "annual income is out of range"));
    }

    let min_income = monthly_debt * 1200.0 / MAX_DTI;
    if !min_income.is_finite() {
        return Err(degenerate("debt", "monthly EMIs are out of range"));
    }
    Ok((max_debt, min_income))
}

fn degenerate(field: &str, reason: &str) -> EvaluationError {
    EvaluationError::invalid(
        field,
        InputIssue::Degenerate {
            reason: reason.to_string(),
        },
    )
}

/// Rule set for the `housing_loan` scenario.
pub struct HousingLoanRules;

impl RuleSet for HousingLoanRules {
    fn scenario_id(&self) -> &'static str {
        "housing_loan"
    }

    fn reads(&self) -> &'static [(&'static str, FieldUse)] {
        &[
            ("creditScore", FieldUse::Number),
            ("income", FieldUse::Number),
            ("debt", FieldUse::Number),
        ]
    }

    fn conditions(&self, values: &FieldValues) -> Result<Vec<Condition>, EvaluationError> {
        let credit_score = values.number("creditScore")?;
        let income = values.number("income")?;
        let debt = values.number("debt")?;

        let dti = debt_to_income(debt, income)?;
        let levers = repayment_levers(debt, income)?;

        Ok(vec![
            credit_condition(credit_score),
            dti_condition(dti, debt, income, levers),
        ])
    }

    fn approval(&self) -> Approval {
        Approval {
            guidance: vec![
                "Submit salary slips for the last 6 months and bank statements for the last 12 months."
                    .to_string(),
                "Final sanction is subject to legal and technical verification of the property."
                    .to_string(),
            ],
            citation: LegalCitation::new(
                "Para 2.3: Lenders shall assess repayment capacity using bureau history and fixed obligations to income.",
                POLICY,
                POLICY_URL,
            ),
        }
    }
}

fn credit_condition(score: f64) -> Condition {
    Condition::hard(
        "CIBIL Score",
        score >= MIN_CREDIT_SCORE,
        requirement(
            format!("at least {}", quantity(MIN_CREDIT_SCORE)),
            quantity(score),
        ),
        Finding {
            explanation: format!(
                "A CIBIL score of {} is below the minimum of {} required for housing loan pre-approval.",
                quantity(score),
                quantity(MIN_CREDIT_SCORE)
            ),
            guidance: vec![
                "Pay all EMIs and card dues on time for at least six months.".to_string(),
                "Keep credit card utilisation below 30% of the limit.".to_string(),
                "Check your CIBIL report for errors and raise a dispute if needed.".to_string(),
            ],
            citation: LegalCitation::new(
                "Para 4.1: Applicants with a bureau score below 700 are not eligible for pre-approved housing credit.",
                POLICY,
                POLICY_URL,
            ),
            counterfactuals: vec![format!(
                "CIBIL score improves to {} or higher",
                quantity(MIN_CREDIT_SCORE)
            )],
        },
    )
}

fn dti_condition(dti: f64, debt: f64, income: f64, levers: (f64, f64)) -> Condition {
    let (max_debt, min_income) = levers;

    Condition::hard(
        "Debt-to-Income Ratio",
        dti <= MAX_DTI,
        requirement(
            format!("at most {}", percent(MAX_DTI)),
            format!(
                "{} ({} monthly EMIs on {} monthly income)",
                percent(dti),
                inr(debt),
                inr(income / 12.0)
            ),
        ),
        Finding {
            explanation: format!(
                "Existing EMIs take up {} of monthly income, above the {} limit. \
                 A new housing loan EMI could not be serviced safely.",
                percent(dti),
                percent(MAX_DTI)
            ),
            guidance: vec![
                "Prepay or close smaller loans to reduce monthly EMIs.".to_string(),
                "Add an earning co-applicant to increase eligible income.".to_string(),
            ],
            citation: LegalCitation::new(
                "Para 4.3: Total fixed obligations, including the proposed EMI, should not exceed 40% of net monthly income.",
                POLICY,
                POLICY_URL,
            ),
            counterfactuals: vec![
                format!("Monthly EMIs fall to {} or less", inr(max_debt)),
                format!("Annual income rises to {} or more", inr(min_income)),
            ],
        },
    )
}
