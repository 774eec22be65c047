//! Defaults derived from the model identifier or fixed constants.

use serde_json::{Value, json};

use aibom_core::{Strategy, is_informative};
use aibom_registry::FieldDefinition;

use super::FieldStrategy;
use crate::context::ExtractionContext;
use crate::references::HUB_BASE_URL;

type Rule = fn(&ExtractionContext) -> Option<Value>;

static RULES: &[(&str, Rule)] = &[
    ("author", namespace),
    ("suppliedBy", namespace),
    ("name", |ctx| Some(json!(ctx.short_name()))),
    ("primaryPurpose", |_| Some(json!("text-generation"))),
    ("typeOfModel", |_| Some(json!("transformer"))),
    ("downloadLocation", |ctx| {
        Some(json!(format!("{HUB_BASE_URL}/{}/tree/main", ctx.model_id())))
    }),
    ("bomFormat", |_| Some(json!("CycloneDX"))),
    ("specVersion", |_| Some(json!("1.6"))),
    ("serialNumber", |ctx| {
        Some(json!(format!("urn:uuid:{}", ctx.model_id().replace('/', "-"))))
    }),
    ("version", |_| Some(json!("1.0.0"))),
];

fn namespace(context: &ExtractionContext) -> Option<Value> {
    context.namespace().map(|namespace| json!(namespace))
}

pub fn rule(field: &str) -> Option<Rule> {
    RULES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, rule)| *rule)
}

/// Strategy 5: identifier-derived defaults.
pub struct InferenceStrategy;

impl FieldStrategy for InferenceStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Inference
    }

    fn applies(&self, field: &str, _definition: &FieldDefinition, _context: &ExtractionContext) -> bool {
        rule(field).is_some()
    }

    fn extract(
        &self,
        field: &str,
        _definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value> {
        rule(field)?(context).filter(is_informative)
    }
}
