//! Resolution strategies of the extraction chain.
//!
//! Each strategy is a named, stateless lookup over the
//! [`ExtractionContext`]. Field-specific behavior lives in static tables of
//! plain `fn` pointers or keys inside each strategy module; catalog
//! [`ExtractionHints`](aibom_registry::ExtractionHints) override those
//! tables per field, so new fields can be extracted by data alone.

pub mod api;
pub mod card;
pub mod config;
pub mod enrichment;
pub mod fallback;
pub mod inference;
pub mod license_file;
pub mod pattern;

use std::sync::Arc;

use serde_json::Value;

use aibom_core::Strategy;
use aibom_registry::FieldDefinition;

use crate::context::ExtractionContext;
use crate::enrich::Summarizer;

/// One step of the extraction chain.
///
/// Strategies run in [`Strategy::CHAIN`] order; the first one returning a
/// value ends the chain for that field.
pub trait FieldStrategy: Send + Sync {
    fn kind(&self) -> Strategy;

    /// Returns `false` when the strategy does not run for this field at
    /// all. Skipped strategies are left out of the recorded fallback chain.
    fn applies(&self, _field: &str, _definition: &FieldDefinition, _context: &ExtractionContext) -> bool {
        true
    }

    fn extract(
        &self,
        field: &str,
        definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value>;
}

/// Builds the full chain in resolution order.
pub fn default_chain(summarizer: Arc<dyn Summarizer>) -> Vec<Box<dyn FieldStrategy>> {
    vec![
        Box::new(api::ApiStrategy),
        Box::new(card::CardStrategy),
        Box::new(config::ConfigStrategy),
        Box::new(pattern::PatternStrategy),
        Box::new(inference::InferenceStrategy),
        Box::new(license_file::LicenseFileStrategy),
        Box::new(enrichment::EnrichmentStrategy::new(summarizer)),
        Box::new(fallback::FallbackStrategy),
    ]
}

/// License-type fields: `license`, `licenses`, or any field whose catalog
/// hints route it to the `license` pattern category.
pub fn is_license_field(field: &str, definition: &FieldDefinition) -> bool {
    matches!(field, "license" | "licenses")
        || definition
            .extraction
            .as_ref()
            .and_then(|hints| hints.pattern_category.as_deref())
            == Some(pattern::LICENSE_CATEGORY)
}

#[cfg(test)]
mod tests {
    use aibom_core::Tier;
    use aibom_registry::ExtractionHints;

    use super::*;
    use crate::enrich::NoSummarizer;

    #[test]
    fn test_default_chain_follows_resolution_order() {
        let kinds: Vec<Strategy> = default_chain(Arc::new(NoSummarizer))
            .iter()
            .map(|strategy| strategy.kind())
            .collect();
        assert_eq!(kinds, Strategy::CHAIN.to_vec());
    }

    #[test]
    fn test_license_field_detection() {
        let plain = FieldDefinition::new("license", Tier::Critical, "component_basic");
        assert!(is_license_field("license", &plain));
        assert!(!is_license_field("description", &plain));

        let hinted = FieldDefinition::new("usage_terms", Tier::Important, "component_basic")
            .with_extraction(ExtractionHints {
                pattern_category: Some("license".into()),
                ..Default::default()
            });
        assert!(is_license_field("usage_terms", &hinted));
    }
}
