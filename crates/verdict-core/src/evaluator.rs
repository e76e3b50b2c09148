//! Per-scenario evaluation function.

use tracing::{debug, info};

use crate::fields::coerce_inputs;
use crate::registry::ScenarioDefinition;
use crate::synthesizer::Synthesizer;
use crate::types::{DecisionRecord, RawInputs};
use crate::EvaluationError;

/// Evaluation function bound to one registered scenario.
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    definition: &'a ScenarioDefinition,
}

impl<'a> Evaluator<'a> {
    pub fn new(definition: &'a ScenarioDefinition) -> Self {
        Self { definition }
    }

    pub fn scenario_id(&self) -> &'a str {
        self.definition.id()
    }

    /// Evaluate raw form inputs.
    ///
    /// Inputs are coerced and derived values checked before any condition is
    /// evaluated; on error no partial decision is produced.
    pub fn evaluate(&self, raw: &RawInputs) -> Result<DecisionRecord, EvaluationError> {
        let meta = &self.definition.meta;

        let values = coerce_inputs(meta, raw)?;
        let conditions = self.definition.rules.conditions(&values)?;
        debug!(scenario = %meta.id, conditions = conditions.len(), "conditions evaluated");

        let record = Synthesizer::new().synthesize(
            &meta.id,
            &meta.title,
            &conditions,
            self.definition.rules.approval(),
        );

        info!(
            scenario = %meta.id,
            outcome = ?record.outcome,
            key_factor = %record.key_factor,
            "decision reached"
        );
        Ok(record)
    }
}
