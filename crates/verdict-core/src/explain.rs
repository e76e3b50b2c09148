//! Explanation & trace formatting.
//!
//! Pure string templating over values the rule sets have already computed.
//! Every scenario goes through these helpers so trace entries share one shape.

use crate::rules::Condition;
use crate::types::{CheckStatus, Outcome, RuleCheck};

/// Label of the synthesized last trace entry.
pub const FINAL_DETERMINATION: &str = "Final Determination";

/// Key factor reported when nothing fails.
pub const ALL_CRITERIA: &str = "All Criteria";

/// Format a rupee amount with Indian digit grouping (e.g., `₹1,00,00,000`).
///
/// Digits come from the decimal rendering of the value, so amounts beyond
/// any integer type keep every digit.
pub fn inr(amount: f64) -> String {
    let text = format!("{:.2}", amount.abs());
    let (whole, paise) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if amount < 0.0 && text != "0.00" { "-" } else { "" };

    let grouped = group_indian(whole);
    if paise == "00" {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{paise}")
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Format a plain quantity, dropping a zero fractional part.
pub fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Format a percentage with two decimals.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Uniform detail text: the requirement, then what was recorded.
pub fn requirement(required: impl AsRef<str>, recorded: impl AsRef<str>) -> String {
    format!(
        "Required: {}. Recorded: {}.",
        required.as_ref(),
        recorded.as_ref()
    )
}

/// Trace entry for one evaluated condition.
pub fn check(condition: &Condition) -> RuleCheck {
    let status = if condition.satisfied {
        CheckStatus::Pass
    } else if condition.requirement.is_hard() {
        CheckStatus::Fail
    } else {
        CheckStatus::Neutral
    };

    RuleCheck {
        label: condition.factor.to_string(),
        detail: condition.detail.clone(),
        status,
    }
}

/// Synthesized last trace entry summarizing the outcome.
pub fn final_determination(title: &str, outcome: Outcome, key_factor: &str) -> RuleCheck {
    let detail = match outcome {
        Outcome::Approved => format!("{title}: application {}.", outcome.determination()),
        _ => format!(
            "{title}: application {} on {key_factor}.",
            outcome.determination()
        ),
    };

    RuleCheck {
        label: FINAL_DETERMINATION.to_string(),
        detail,
        status: outcome.status(),
    }
}

/// Summary used as the explanation of an approval.
pub fn approval_summary(title: &str, criteria: usize) -> String {
    format!(
        "All {criteria} eligibility criteria for the {title} are satisfied. \
         The application is in full compliance with the programme rules."
    )
}
