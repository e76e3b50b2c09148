//! Presenter: renders decision records and field schemas.
//!
//! The presenter is handed the record and the render target explicitly. It
//! owns the presentation-only metadata (reference id, timestamp); nothing it
//! produces flows back into evaluation.

use std::io::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use rand::Rng;
use serde::Serialize;
use verdict_core::{
    CheckStatus, DecisionRecord, FieldKind, FieldSpec, Outcome, ScenarioSummary,
};

/// Output format for rendered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
    Yaml,
}

/// A decision record stamped for the audit view.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEnvelope<'a> {
    pub reference_id: String,
    pub issued_at: DateTime<Utc>,
    pub decision: &'a DecisionRecord,
}

impl<'a> AuditEnvelope<'a> {
    /// Stamp a record with a fresh reference id and the current time.
    pub fn issue(decision: &'a DecisionRecord) -> Self {
        Self::issue_with(decision, &mut rand::thread_rng(), Utc::now())
    }

    pub fn issue_with<R: Rng>(
        decision: &'a DecisionRecord,
        rng: &mut R,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reference_id: reference_id(rng),
            issued_at,
            decision,
        }
    }
}

/// Reference id in the form `REF-######-AUD`.
pub fn reference_id<R: Rng>(rng: &mut R) -> String {
    format!("REF-{:06}-AUD", rng.gen_range(0..1_000_000u32))
}

fn marker(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "[PASS]",
        CheckStatus::Fail => "[FAIL]",
        CheckStatus::Neutral => "[NOTE]",
    }
}

fn banner(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Approved => "==> APPROVED",
        Outcome::Denied => "==> DENIED",
        Outcome::Review => "==> MANUAL REVIEW",
    }
}

/// Render the applicant-facing result card.
pub fn render_card(record: &DecisionRecord, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", banner(record.outcome))?;
    writeln!(out, "Key factor: {}", record.key_factor)?;
    writeln!(out)?;
    writeln!(out, "{}", record.explanation)?;
    writeln!(out)?;
    writeln!(out, "Legal basis: {}", record.citation.clause)?;
    writeln!(out, "  {} <{}>", record.citation.source, record.citation.url)?;

    if !record.guidance.is_empty() {
        writeln!(out)?;
        writeln!(out, "Next steps:")?;
        for step in &record.guidance {
            writeln!(out, "  - {step}")?;
        }
    }

    Ok(())
}

/// Render the formal audit record.
pub fn render_audit(envelope: &AuditEnvelope<'_>, out: &mut impl Write) -> io::Result<()> {
    let record = envelope.decision;

    writeln!(out, "COMPLIANCE AUDIT RECORD")?;
    writeln!(out, "Reference: {}", envelope.reference_id)?;
    writeln!(
        out,
        "Issued:    {}",
        envelope.issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    writeln!(out, "Scenario:  {}", record.scenario_id)?;
    writeln!(out, "Outcome:   {}", record.outcome)?;
    writeln!(out)?;
    writeln!(out, "Compliance trace:")?;
    for (index, check) in record.trace.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {} {}",
            index + 1,
            marker(check.status),
            check.label
        )?;
        writeln!(out, "      {}", check.detail)?;
    }

    if !record.counterfactuals.is_empty() {
        writeln!(out)?;
        writeln!(out, "Outcome would change if:")?;
        for condition in &record.counterfactuals {
            writeln!(out, "  - {condition}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Cited clause: {}", record.citation.clause)?;
    writeln!(out, "  {} <{}>", record.citation.source, record.citation.url)?;
    Ok(())
}

/// Render a decision in the chosen format.
pub fn render(
    record: &DecisionRecord,
    format: Format,
    audit: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match (format, audit) {
        (Format::Text, false) => render_card(record, out)?,
        (Format::Text, true) => render_audit(&AuditEnvelope::issue(record), out)?,
        (Format::Json, false) => {
            serde_json::to_writer_pretty(&mut *out, record)?;
            writeln!(out)?;
        }
        (Format::Json, true) => {
            serde_json::to_writer_pretty(&mut *out, &AuditEnvelope::issue(record))?;
            writeln!(out)?;
        }
        (Format::Yaml, false) => serde_yaml::to_writer(&mut *out, record)?,
        (Format::Yaml, true) => serde_yaml::to_writer(&mut *out, &AuditEnvelope::issue(record))?,
    }
    Ok(())
}

/// Render the scenario selector.
pub fn render_scenarios(scenarios: &[ScenarioSummary], out: &mut impl Write) -> io::Result<()> {
    let width = scenarios.iter().map(|s| s.id.len()).max().unwrap_or(0);
    for scenario in scenarios {
        writeln!(out, "{:<width$}  {}", scenario.id, scenario.title)?;
        if !scenario.description.is_empty() {
            writeln!(out, "{:<width$}  {}", "", scenario.description)?;
        }
    }
    Ok(())
}

fn describe_kind(field: &FieldSpec) -> String {
    match &field.kind {
        FieldKind::Number { min, max } => match (min, max) {
            (Some(min), Some(max)) => format!("number {min}..={max}"),
            (Some(min), None) => format!("number >= {min}"),
            (None, Some(max)) => format!("number <= {max}"),
            (None, None) => "number".to_string(),
        },
        FieldKind::Enum { options } => format!("one of {}", options.join(" | ")),
    }
}

/// Render a scenario's form fields.
pub fn render_fields(fields: &[FieldSpec], out: &mut impl Write) -> io::Result<()> {
    let width = fields.iter().map(|f| f.id.len()).max().unwrap_or(0);
    for field in fields {
        write!(
            out,
            "{:<width$}  {} ({})",
            field.id,
            field.label,
            describe_kind(field)
        )?;
        match &field.placeholder {
            Some(hint) => writeln!(out, "  {hint}")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use verdict_core::{evaluate, RawInputs};

    fn denied_record() -> DecisionRecord {
        let inputs: RawInputs = [("creditScore", "650"), ("income", "1200000"), ("debt", "15000")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        evaluate("housing_loan", &inputs).unwrap()
    }

    #[test]
    fn test_reference_id_format() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let id = reference_id(&mut rng);
            assert_eq!(id.len(), "REF-000000-AUD".len());
            assert!(id.starts_with("REF-"));
            assert!(id.ends_with("-AUD"));
            assert!(id[4..10].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_card_shows_outcome_and_guidance() {
        let record = denied_record();
        let mut out = Vec::new();
        render_card(&record, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("==> DENIED"));
        assert!(text.contains("Key factor: CIBIL Score"));
        assert!(text.contains("Next steps:"));
    }

    #[test]
    fn test_audit_record_lists_trace_and_counterfactuals() {
        let record = denied_record();
        let issued_at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let envelope =
            AuditEnvelope::issue_with(&record, &mut StdRng::seed_from_u64(1), issued_at);

        let mut out = Vec::new();
        render_audit(&envelope, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&format!("Reference: {}", envelope.reference_id)));
        assert!(text.contains("Issued:    2024-03-01T10:30:00Z"));
        assert!(text.contains(" 1. [FAIL] CIBIL Score"));
        assert!(text.contains(" 3. [FAIL] Final Determination"));
        assert!(text.contains("CIBIL score improves to 700 or higher"));
    }

    #[test]
    fn test_audit_stamp_does_not_touch_decision() {
        let record = denied_record();
        let before = record.clone();
        let _ = AuditEnvelope::issue(&record);
        assert_eq!(record, before);
    }

    #[test]
    fn test_json_output_is_the_record() {
        let record = denied_record();
        let mut out = Vec::new();
        render(&record, Format::Json, false, &mut out).unwrap();

        let parsed: DecisionRecord = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_fields_render_kind_and_placeholder() {
        let fields = verdict_core::get_fields("student_loan").unwrap();
        let mut out = Vec::new();
        render_fields(fields, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("admission"));
        assert!(text.contains("one of Yes | No"));
        assert!(text.contains("number >= 0"));
    }
}
