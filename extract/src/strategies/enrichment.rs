use std::sync::Arc;

use serde_json::{Value, json};

use aibom_core::Strategy;
use aibom_registry::FieldDefinition;

use super::FieldStrategy;
use crate::context::ExtractionContext;
use crate::enrich::{Summarizer, summarize_description};

/// Strategy 7: README-derived description, opt-in per run.
pub struct EnrichmentStrategy {
    summarizer: Arc<dyn Summarizer>,
}

impl EnrichmentStrategy {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self { summarizer }
    }
}

impl FieldStrategy for EnrichmentStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Enrichment
    }

    fn applies(&self, field: &str, _definition: &FieldDefinition, context: &ExtractionContext) -> bool {
        field == "description" && context.enable_enrichment() && context.readme().is_some()
    }

    fn extract(
        &self,
        _field: &str,
        _definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value> {
        let readme = context.readme()?;
        summarize_description(readme, context.model_id(), self.summarizer.as_ref()).map(|text| json!(text))
    }
}

#[cfg(test)]
mod tests {
    use aibom_core::Tier;

    use super::*;
    use crate::enrich::NoSummarizer;

    const README: &str = "# Overview\n\nWidget is a compact model designed for code completion. It runs on laptops.\n";

    fn description() -> FieldDefinition {
        FieldDefinition::new("description", Tier::Important, "component_basic")
    }

    #[test]
    fn test_requires_opt_in() {
        let strategy = EnrichmentStrategy::new(Arc::new(NoSummarizer));
        let off = ExtractionContext::builder("acme/widget").readme(README).build();
        assert!(!strategy.applies("description", &description(), &off));

        let on = ExtractionContext::builder("acme/widget")
            .readme(README)
            .enable_enrichment(true)
            .build();
        assert!(strategy.applies("description", &description(), &on));
        assert!(!strategy.applies("name", &description(), &on));
    }

    #[test]
    fn test_falls_back_to_source_sentences() {
        let strategy = EnrichmentStrategy::new(Arc::new(NoSummarizer));
        let context = ExtractionContext::builder("acme/widget")
            .readme(README)
            .enable_enrichment(true)
            .build();
        assert_eq!(
            strategy.extract("description", &description(), &context),
            Some(json!(
                "Widget is a compact model designed for code completion. It runs on laptops."
            ))
        );
    }
}
