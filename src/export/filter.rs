use regex::Regex;

use crate::error::{ExportError, ExportResult};
use crate::models::MetricEntity;

/// Predicate over catalog entities. Both the name and the kind pattern
/// must match for an entity to pass; patterns use search semantics, not
/// full-string anchoring.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    name: Regex,
    kind: Regex,
}

impl EntityFilter {
    pub fn new(name_pattern: &str, kind_pattern: &str) -> ExportResult<Self> {
        Ok(Self {
            name: compile(name_pattern)?,
            kind: compile(kind_pattern)?,
        })
    }

    pub fn matches(&self, entity: &MetricEntity) -> bool {
        self.name.is_match(&entity.name) && self.kind.is_match(&entity.kind)
    }
}

fn compile(pattern: &str) -> ExportResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| ExportError::Config(format!("invalid filter pattern '{pattern}': {e}")))
}
