//! MSME Business Grant
//!
//! Precedence: revenue ceiling, operating history, headcount, then sector
//! priority. Sector is the only soft condition; a non-priority sector is
//! referred for review rather than denied.

use crate::explain::{inr, quantity, requirement};
use crate::fields::FieldValues;
use crate::types::LegalCitation;
use crate::EvaluationError;

use super::{Approval, Condition, FieldUse, Finding, RuleSet};

/// Revenue must be strictly below this (INR).
pub const REVENUE_CEILING: f64 = 10_000_000.0;
pub const MIN_YEARS: f64 = 2.0;
pub const MIN_EMPLOYEES: f64 = 3.0;
pub const PRIORITY_SECTORS: [&str; 3] = ["Retail", "Hospitality", "Manufacturing"];

const SCHEME: &str = "MSME Working Capital Grant Scheme Guidelines";
const SCHEME_URL: &str = "https://msme.gov.in/schemes";

/// Rule set for the `business_grant` scenario.
pub struct BusinessGrantRules;

impl RuleSet for BusinessGrantRules {
    fn scenario_id(&self) -> &'static str {
        "business_grant"
    }

    fn reads(&self) -> &'static [(&'static str, FieldUse)] {
        &[
            ("revenue", FieldUse::Number),
            ("years", FieldUse::Number),
            ("employees", FieldUse::Number),
            ("sector", FieldUse::Choice),
        ]
    }

    fn conditions(&self, values: &FieldValues) -> Result<Vec<Condition>, EvaluationError> {
        let revenue = values.number("revenue")?;
        let years = values.number("years")?;
        let employees = values.number("employees")?;
        let sector = values.choice("sector")?;

        Ok(vec![
            revenue_condition(revenue),
            years_condition(years),
            employees_condition(employees),
            sector_condition(sector),
        ])
    }

    fn approval(&self) -> Approval {
        Approval {
            guidance: vec![
                "Upload your Udyam registration certificate and the last two years of GST returns."
                    .to_string(),
                "The grant is disbursed to the business account within 30 days of document verification."
                    .to_string(),
            ],
            citation: LegalCitation::new(
                "Clause 3: Enterprises meeting the turnover, vintage and employment criteria are eligible for the grant.",
                SCHEME,
                SCHEME_URL,
            ),
        }
    }
}

fn revenue_condition(revenue: f64) -> Condition {
    Condition::hard(
        "Annual Revenue",
        revenue < REVENUE_CEILING,
        requirement(
            format!("below {}", inr(REVENUE_CEILING)),
            inr(revenue),
        ),
        Finding {
            explanation: format!(
                "Annual revenue of {} is at or above the {} ceiling for small enterprises, \
                 so the business does not qualify for this grant.",
                inr(revenue),
                inr(REVENUE_CEILING)
            ),
            guidance: vec![
                "Consider the growth-stage enterprise credit programmes offered by SIDBI.".to_string(),
                "If the figure included non-operating income, resubmit with audited operating revenue."
                    .to_string(),
            ],
            citation: LegalCitation::new(
                "Section 7(1): An enterprise is classified as small where its annual turnover does not exceed the notified limit.",
                "Micro, Small and Medium Enterprises Development Act, 2006",
                "https://msme.gov.in/acts-and-rules",
            ),
            counterfactuals: vec![format!(
                "Annual revenue is below {}",
                inr(REVENUE_CEILING)
            )],
        },
    )
}

fn years_condition(years: f64) -> Condition {
    Condition::hard(
        "Years in Operation",
        years >= MIN_YEARS,
        requirement(
            format!("at least {} years", quantity(MIN_YEARS)),
            format!("{} years", quantity(years)),
        ),
        Finding {
            explanation: format!(
                "The business has operated for {} years; the grant requires a track record of at least {} years.",
                quantity(years),
                quantity(MIN_YEARS)
            ),
            guidance: vec![
                "Reapply once the business completes two full years of operation.".to_string(),
                "Early-stage businesses may apply for seed support under the Startup India scheme."
                    .to_string(),
            ],
            citation: LegalCitation::new(
                "Clause 4.2: Applicants must demonstrate a minimum of two years of continuous operation.",
                SCHEME,
                SCHEME_URL,
            ),
            counterfactuals: vec![format!(
                "The business has operated for at least {} years",
                quantity(MIN_YEARS)
            )],
        },
    )
}

fn employees_condition(employees: f64) -> Condition {
    Condition::hard(
        "Employee Count",
        employees >= MIN_EMPLOYEES,
        requirement(
            format!("at least {} employees", quantity(MIN_EMPLOYEES)),
            format!("{} employees", quantity(employees)),
        ),
        Finding {
            explanation: format!(
                "The business employs {} people; the grant is limited to enterprises with at least {} employees.",
                quantity(employees),
                quantity(MIN_EMPLOYEES)
            ),
            guidance: vec![
                "Include all employees on the payroll, including part-time staff registered with EPFO."
                    .to_string(),
            ],
            citation: LegalCitation::new(
                "Clause 4.3: The grant supports enterprises that generate employment for three or more persons.",
                SCHEME,
                SCHEME_URL,
            ),
            counterfactuals: vec![format!(
                "The business employs at least {} people",
                quantity(MIN_EMPLOYEES)
            )],
        },
    )
}

fn sector_condition(sector: &str) -> Condition {
    let priority = PRIORITY_SECTORS.join(", ");

    Condition::soft(
        "Priority Sector",
        PRIORITY_SECTORS.contains(&sector),
        requirement(format!("one of {priority}"), sector),
        Finding {
            explanation: format!(
                "{sector} is not a priority sector for this grant. The application meets every \
                 other criterion and is referred to a grant officer for a discretionary decision."
            ),
            guidance: vec![
                "A grant officer will contact you within 10 working days.".to_string(),
                "Prepare a short note on how the business supports local employment or supply chains."
                    .to_string(),
            ],
            citation: LegalCitation::new(
                "Clause 5.1: Applications outside the priority sectors may be approved at the discretion of the sanctioning committee.",
                SCHEME,
                SCHEME_URL,
            ),
            counterfactuals: vec![format!(
                "The business operates in a priority sector ({priority})"
            )],
        },
    )
}
