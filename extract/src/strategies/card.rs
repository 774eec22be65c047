//! Structured model-card (front-matter) lookups.

use serde_json::Value;

use aibom_core::{Strategy, is_informative};
use aibom_registry::FieldDefinition;

use super::FieldStrategy;
use crate::context::ExtractionContext;

/// Field name to card keys, tried in order.
static CARD_KEYS: &[(&str, &[&str])] = &[
    ("license", &["license"]),
    ("licenses", &["license"]),
    ("language", &["language"]),
    ("library_name", &["library_name"]),
    ("base_model", &["base_model"]),
    ("datasets", &["datasets"]),
    ("description", &["model_summary", "description"]),
    ("typeOfModel", &["model_type"]),
];

/// Card keys consulted for `field`: catalog hints first, then the built-in
/// table, then the field name itself.
pub fn card_keys<'a>(field: &'a str, definition: &'a FieldDefinition) -> Vec<&'a str> {
    if let Some(hints) = &definition.extraction
        && !hints.card_keys.is_empty()
    {
        return hints.card_keys.iter().map(String::as_str).collect();
    }
    CARD_KEYS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, keys)| keys.to_vec())
        .unwrap_or_else(|| vec![field])
}

/// Strategy 2: structured card data.
pub struct CardStrategy;

impl FieldStrategy for CardStrategy {
    fn kind(&self) -> Strategy {
        Strategy::ModelCard
    }

    fn applies(&self, _field: &str, _definition: &FieldDefinition, context: &ExtractionContext) -> bool {
        context.card().is_some_and(|card| !card.data.is_empty())
    }

    fn extract(
        &self,
        field: &str,
        definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value> {
        let card = context.card()?;
        card_keys(field, definition)
            .into_iter()
            .filter_map(|key| card.get(key))
            .find(|value| is_informative(value))
            .cloned()
    }
}
