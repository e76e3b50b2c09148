//! Scenario catalogue parsing and validation.
//!
//! The catalogue holds display metadata and input schemas. It is structured
//! data validated against JSON Schema; thresholds are not part of it.

mod parser;

pub use parser::{Catalogue, CatalogueError, FieldKind, FieldSpec, ScenarioMeta};

/// Built-in catalogue (embedded at compile time).
pub(crate) const BUILTIN_CATALOGUE_YAML: &str = include_str!("../../../../spec/scenarios.yaml");
