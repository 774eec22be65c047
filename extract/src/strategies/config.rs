//! Auxiliary configuration record lookups.

use serde_json::Value;

use aibom_core::{Strategy, is_informative};
use aibom_registry::{ConfigKey, FieldDefinition};

use super::FieldStrategy;
use crate::context::ExtractionContext;

/// Field name to `(record, key)`.
static CONFIG_KEYS: &[(&str, (&str, &str))] = &[
    ("model_type", ("config.json", "model_type")),
    ("architectures", ("config.json", "architectures")),
    ("vocab_size", ("config.json", "vocab_size")),
    ("tokenizer_class", ("tokenizer_config.json", "tokenizer_class")),
    ("typeOfModel", ("config.json", "model_type")),
];

/// Record lookup for `field`: catalog hint first, then the built-in table.
pub fn config_key(field: &str, definition: &FieldDefinition) -> Option<ConfigKey> {
    if let Some(key) = definition
        .extraction
        .as_ref()
        .and_then(|hints| hints.config.clone())
    {
        return Some(key);
    }
    CONFIG_KEYS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, (record, key))| ConfigKey::new(*record, *key))
}

/// Strategy 3: downloaded configuration records.
pub struct ConfigStrategy;

impl FieldStrategy for ConfigStrategy {
    fn kind(&self) -> Strategy {
        Strategy::ConfigFile
    }

    fn applies(&self, field: &str, definition: &FieldDefinition, _context: &ExtractionContext) -> bool {
        config_key(field, definition).is_some()
    }

    fn extract(
        &self,
        field: &str,
        definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value> {
        let ConfigKey { record, key } = config_key(field, definition)?;
        context
            .config(&record)?
            .get(&key)
            .filter(|value| is_informative(value))
            .cloned()
    }
}
