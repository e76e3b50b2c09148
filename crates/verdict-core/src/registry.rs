//! Scenario registry.
//!
//! Binds each catalogue entry to its rule set. Built once, read-only after
//! that; evaluations share it without any mutable state.

use lazy_static::lazy_static;
use tracing::debug;

use crate::catalogue::{Catalogue, CatalogueError, FieldKind, ScenarioMeta, BUILTIN_CATALOGUE_YAML};
use crate::evaluator::Evaluator;
use crate::rules::{self, FieldUse, RuleSet};
use crate::types::ScenarioSummary;
use crate::{EvaluationError, FieldSpec};

lazy_static! {
    static ref BUILTIN: Registry =
        Registry::from_catalogue(BUILTIN_CATALOGUE_YAML, &rules::builtin())
            .expect("built-in catalogue must bind to the built-in rule sets");
}

/// One scenario: metadata, field schema, and its evaluation function.
pub struct ScenarioDefinition {
    pub meta: ScenarioMeta,
    pub rules: &'static dyn RuleSet,
}

impl ScenarioDefinition {
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.meta.id.clone(),
            title: self.meta.title.clone(),
            description: self.meta.description.clone(),
        }
    }
}

/// Fixed catalogue of scenarios, in catalogue order.
pub struct Registry {
    scenarios: Vec<ScenarioDefinition>,
}

impl Registry {
    /// The built-in registry.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// Build a registry from catalogue YAML and a set of rule sets.
    ///
    /// Every catalogue entry must bind to a rule set with the same id, and
    /// every field a rule set reads must be declared with a matching kind.
    pub fn from_catalogue(
        yaml: &str,
        rule_sets: &[&'static dyn RuleSet],
    ) -> Result<Self, CatalogueError> {
        let catalogue = Catalogue::from_yaml(yaml)?;

        let mut scenarios = Vec::with_capacity(catalogue.scenarios.len());
        for meta in catalogue.scenarios {
            let rules = rule_sets
                .iter()
                .copied()
                .find(|r| r.scenario_id() == meta.id)
                .ok_or_else(|| CatalogueError::UnboundRuleSet(meta.id.clone()))?;

            check_reads(&meta, rules)?;
            debug!(scenario = %meta.id, fields = meta.fields.len(), "scenario registered");
            scenarios.push(ScenarioDefinition { meta, rules });
        }

        Ok(Self { scenarios })
    }

    /// Selector entries, in catalogue order.
    pub fn list_scenarios(&self) -> Vec<ScenarioSummary> {
        self.scenarios.iter().map(ScenarioDefinition::summary).collect()
    }

    pub fn get(&self, id: &str) -> Result<&ScenarioDefinition, EvaluationError> {
        self.scenarios
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| EvaluationError::UnknownScenario { id: id.to_string() })
    }

    /// Ordered field schema of a scenario.
    pub fn get_fields(&self, id: &str) -> Result<&[FieldSpec], EvaluationError> {
        self.get(id).map(|s| s.meta.fields.as_slice())
    }

    /// Evaluation function of a scenario.
    pub fn get_evaluator(&self, id: &str) -> Result<Evaluator<'_>, EvaluationError> {
        self.get(id).map(Evaluator::new)
    }
}

fn check_reads(meta: &ScenarioMeta, rules: &dyn RuleSet) -> Result<(), CatalogueError> {
    for (field_id, usage) in rules.reads() {
        let matches = match (meta.field(field_id).map(|f| &f.kind), usage) {
            (Some(FieldKind::Number { .. }), FieldUse::Number) => true,
            (Some(FieldKind::Enum { .. }), FieldUse::Choice) => true,
            _ => false,
        };

        if !matches {
            return Err(CatalogueError::UndeclaredField {
                scenario: meta.id.clone(),
                field: field_id.to_string(),
            });
        }
    }

    Ok(())
}
