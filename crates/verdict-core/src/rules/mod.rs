//! Rule sets: one per scenario.
//!
//! A rule set turns coerced inputs into an ordered list of conditions. The
//! order is the precedence order: the first unmet hard or soft condition
//! decides the outcome. Thresholds are constants in each rule set module.

mod business_grant;
mod housing_loan;
mod scholarship;
mod student_loan;

pub use business_grant::BusinessGrantRules;
pub use housing_loan::HousingLoanRules;
pub use scholarship::ScholarshipRules;
pub use student_loan::StudentLoanRules;

use crate::fields::FieldValues;
use crate::types::LegalCitation;
use crate::EvaluationError;

/// What a condition produces when it decides the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Plain-text reason for the outcome
    pub explanation: String,

    /// Next steps for the applicant
    pub guidance: Vec<String>,

    pub citation: LegalCitation,

    /// Input changes that would satisfy this condition
    pub counterfactuals: Vec<String>,
}

/// How an unmet condition affects the outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// Unmet → Denied
    Hard(Finding),

    /// Unmet → Review
    Soft(Finding),

    /// Never decides; when met, the note is added to guidance
    Informational { note: String },
}

impl Requirement {
    pub fn is_hard(&self) -> bool {
        matches!(self, Requirement::Hard(_))
    }

    /// The finding, for requirements that can decide an outcome.
    pub fn finding(&self) -> Option<&Finding> {
        match self {
            Requirement::Hard(finding) | Requirement::Soft(finding) => Some(finding),
            Requirement::Informational { .. } => None,
        }
    }
}

/// One evaluated condition of a rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Key factor name (e.g., "Annual Revenue")
    pub factor: &'static str,

    pub satisfied: bool,

    /// Threshold and recorded value in words
    pub detail: String,

    pub requirement: Requirement,
}

impl Condition {
    pub fn hard(factor: &'static str, satisfied: bool, detail: String, finding: Finding) -> Self {
        Self {
            factor,
            satisfied,
            detail,
            requirement: Requirement::Hard(finding),
        }
    }

    pub fn soft(factor: &'static str, satisfied: bool, detail: String, finding: Finding) -> Self {
        Self {
            factor,
            satisfied,
            detail,
            requirement: Requirement::Soft(finding),
        }
    }

    pub fn informational(
        factor: &'static str,
        satisfied: bool,
        detail: String,
        note: impl Into<String>,
    ) -> Self {
        Self {
            factor,
            satisfied,
            detail,
            requirement: Requirement::Informational { note: note.into() },
        }
    }

    /// True when this condition is unmet and can decide the outcome.
    pub fn is_blocking(&self) -> bool {
        !self.satisfied && self.requirement.finding().is_some()
    }
}

/// Citation and guidance attached to an approval.
#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
    pub guidance: Vec<String>,
    pub citation: LegalCitation,
}

/// How a rule set reads a field; checked against the catalogue at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUse {
    Number,
    Choice,
}

/// The evaluation function of one scenario.
///
/// # Contract
/// - MUST be pure: same values, same conditions
/// - MUST return conditions in precedence order
/// - MUST report degenerate derived values as `InvalidInput` before
///   building any condition
pub trait RuleSet: Send + Sync {
    /// Catalogue id this rule set binds to.
    fn scenario_id(&self) -> &'static str;

    /// Fields this rule set reads.
    fn reads(&self) -> &'static [(&'static str, FieldUse)];

    /// Evaluate every condition in precedence order.
    fn conditions(&self, values: &FieldValues) -> Result<Vec<Condition>, EvaluationError>;

    /// Citation and guidance used when every condition passes.
    fn approval(&self) -> Approval;
}

static BUSINESS_GRANT: BusinessGrantRules = BusinessGrantRules;
static HOUSING_LOAN: HousingLoanRules = HousingLoanRules;
static STUDENT_LOAN: StudentLoanRules = StudentLoanRules;
static SCHOLARSHIP: ScholarshipRules = ScholarshipRules;

/// Every built-in rule set.
pub fn builtin() -> [&'static dyn RuleSet; 4] {
    [&BUSINESS_GRANT, &HOUSING_LOAN, &STUDENT_LOAN, &SCHOLARSHIP]
}
