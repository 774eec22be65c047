//! Configured and standard placeholder values.

use serde_json::{Value, json};

use aibom_core::{Strategy, is_truthy};
use aibom_registry::FieldDefinition;

use super::FieldStrategy;
use crate::context::ExtractionContext;

/// Placeholders for universally required fields.
static STANDARD_FALLBACKS: &[(&str, &str)] = &[
    ("license", "NOASSERTION"),
    ("description", "No description available"),
    ("version", "1.0.0"),
    ("bomFormat", "CycloneDX"),
    ("specVersion", "1.6"),
];

/// Strategy 8: catalog `fallback_value`, else the standard table.
pub struct FallbackStrategy;

impl FieldStrategy for FallbackStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Fallback
    }

    fn extract(
        &self,
        field: &str,
        definition: &FieldDefinition,
        _context: &ExtractionContext,
    ) -> Option<Value> {
        if let Some(configured) = definition.fallback_value.as_ref().filter(|v| is_truthy(v)) {
            return Some(configured.clone());
        }
        STANDARD_FALLBACKS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| json!(value))
    }
}
