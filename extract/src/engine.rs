//! Extraction orchestration.
//!
//! [`MetadataExtractor`] walks every field of the catalog through the
//! strategy chain and returns the flat metadata map together with one
//! [`ExtractionResult`] per field. Without a catalog it degrades to the
//! fixed legacy layers in [`crate::legacy`].
//!
//! # Architecture
//!
//! Strategies are stateless trait objects held in chain order. For each
//! field, strategies whose [`applies`](FieldStrategy::applies) check fails
//! are skipped silently; the others are tried in order and recorded in the
//! result's `fallback_chain` until one yields a value. The run then adds
//! the repository revision as `commit` and the external references.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use aibom_core::{ExtractionResult, MetadataMap, ProvenanceMap, Strategy};
use aibom_registry::{FieldDefinition, FieldRegistry};

use crate::context::ExtractionContext;
use crate::enrich::{NoSummarizer, Summarizer};
use crate::legacy::extract_legacy;
use crate::references::external_references;
use crate::strategies::{FieldStrategy, default_chain};

/// Which extraction path produced an [`ExtractionOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    Registry,
    Legacy,
}

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Resolved values keyed by field name; unresolved fields are absent.
    pub metadata: MetadataMap,
    /// One record per catalog field, resolved or not. Empty in legacy mode.
    pub provenance: ProvenanceMap,
    pub mode: ExtractionMode,
}

/// Registry-driven metadata extractor.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use aibom_core::{Confidence, DataSource};
/// use aibom_extract::{ExtractionContext, MetadataExtractor, ModelInfo};
/// use aibom_registry::FieldRegistry;
/// use serde_json::json;
///
/// let registry = FieldRegistry::from_value(json!({
///     "fields": {
///         "author": { "tier": "important", "weight": 2, "category": "component_basic" },
///         "license": { "tier": "critical", "weight": 4, "category": "component_basic" }
///     }
/// })).unwrap();
///
/// let extractor = MetadataExtractor::new(Arc::new(registry));
/// let context = ExtractionContext::builder("acme/widget")
///     .model_info(ModelInfo { author: Some("Acme".into()), ..Default::default() })
///     .build();
///
/// let output = extractor.extract(&context);
/// assert_eq!(output.metadata["author"], "Acme");
/// assert_eq!(output.metadata["license"], "NOASSERTION");
/// assert_eq!(output.provenance["license"].source, DataSource::Placeholder);
/// assert_eq!(output.provenance["license"].confidence, Confidence::None);
/// ```
pub struct MetadataExtractor {
    registry: Option<Arc<FieldRegistry>>,
    strategies: Vec<Box<dyn FieldStrategy>>,
}

impl MetadataExtractor {
    /// Creates an extractor over `registry` with generation disabled.
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self {
            registry: Some(registry),
            strategies: default_chain(Arc::new(NoSummarizer)),
        }
    }

    /// Creates an extractor without a catalog; runs use the legacy layers.
    pub fn legacy() -> Self {
        Self {
            registry: None,
            strategies: default_chain(Arc::new(NoSummarizer)),
        }
    }

    /// Replaces the text generator used by description enrichment.
    #[must_use]
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.strategies = default_chain(summarizer);
        self
    }

    pub fn registry(&self) -> Option<&FieldRegistry> {
        self.registry.as_deref()
    }

    /// Runs one field through the strategy chain.
    ///
    /// Returns the value (if any) and its provenance record. Never fails:
    /// a field nothing resolves yields `None` and an `extraction_failed`
    /// record listing every strategy tried.
    pub fn extract_field(
        &self,
        field: &str,
        definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> (Option<Value>, ExtractionResult) {
        let mut tried = Vec::new();
        for strategy in &self.strategies {
            let kind = strategy.kind();
            if !strategy.applies(field, definition, context) {
                continue;
            }
            match strategy.extract(field, definition, context) {
                Some(value) => {
                    debug!(field, strategy = kind.method_name(), "field resolved");
                    let result = ExtractionResult::resolved(value.clone(), kind, tried);
                    return (Some(value), result);
                }
                None => {
                    debug!(field, strategy = kind.method_name(), "strategy yielded nothing");
                    tried.push(kind);
                }
            }
        }
        debug!(field, "field unresolved");
        (None, ExtractionResult::unresolved(tried))
    }

    /// Extracts every catalog field, or runs the legacy layers when the
    /// extractor has no catalog.
    pub fn extract(&self, context: &ExtractionContext) -> ExtractionOutput {
        let Some(registry) = self.registry.as_deref() else {
            warn!(model = context.model_id(), "no field catalog, using legacy extraction");
            return ExtractionOutput {
                metadata: extract_legacy(context),
                provenance: ProvenanceMap::new(),
                mode: ExtractionMode::Legacy,
            };
        };

        let mut metadata = MetadataMap::new();
        let mut provenance = ProvenanceMap::new();
        for (name, definition) in registry.field_definitions() {
            let (value, result) = self.extract_field(name, definition, context);
            if let Some(value) = value {
                metadata.insert(name.clone(), value);
            }
            provenance.insert(name.clone(), result);
        }

        let resolved = provenance.values().filter(|result| result.is_resolved()).count();
        info!(
            model = context.model_id(),
            resolved,
            unresolved = provenance.len() - resolved,
            "registry extraction complete"
        );

        if !metadata.contains_key("commit")
            && let Some(sha) = context.model_info().and_then(|info| info.sha.as_deref())
        {
            metadata.insert("commit".into(), json!(sha));
            provenance.insert(
                "commit".into(),
                ExtractionResult::resolved(json!(sha), Strategy::Api, Vec::new()),
            );
        }

        let refs = external_references(context.model_id(), &metadata);
        metadata.insert("external_references".into(), json!(refs));

        ExtractionOutput {
            metadata,
            provenance,
            mode: ExtractionMode::Registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use aibom_core::{Confidence, DataSource, Tier};

    use super::*;
    use crate::context::ModelInfo;

    fn registry() -> Arc<FieldRegistry> {
        Arc::new(
            FieldRegistry::from_value(json!({
                "fields": {
                    "author": { "tier": "important", "weight": 2, "category": "component_basic" },
                    "bomFormat": { "tier": "critical", "weight": 4, "category": "required_fields" },
                    "hyperparameter": { "tier": "supplementary", "weight": 1, "category": "component_model_card" }
                }
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_extract_field_records_tried_strategies() {
        let extractor = MetadataExtractor::new(registry());
        let context = ExtractionContext::builder("acme/widget")
            .model_info(ModelInfo::default())
            .readme("---\ntags: [x]\n---\nbody\n")
            .build();
        let def = FieldDefinition::new("bomFormat", Tier::Critical, "required_fields");

        let (value, result) = extractor.extract_field("bomFormat", &def, &context);
        assert_eq!(value, Some(json!("CycloneDX")));
        assert_eq!(result.method, Strategy::Inference);
        assert_eq!(result.source, DataSource::Inference);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.fallback_chain, vec![Strategy::ModelCard]);
    }

    #[test]
    fn test_unresolved_field_is_omitted() {
        let extractor = MetadataExtractor::new(registry());
        let output = extractor.extract(&ExtractionContext::builder("acme/widget").build());
        assert!(!output.metadata.contains_key("hyperparameter"));
        let record = &output.provenance["hyperparameter"];
        assert_eq!(record.method, Strategy::Unresolved);
        assert_eq!(record.source, DataSource::None);
        assert_eq!(record.confidence, Confidence::None);
        assert_eq!(record.value, None);
    }

    #[test]
    fn test_commit_added_from_revision() {
        let extractor = MetadataExtractor::new(registry());
        let context = ExtractionContext::builder("acme/widget")
            .model_info(ModelInfo {
                sha: Some("0123abc".into()),
                ..Default::default()
            })
            .build();
        let output = extractor.extract(&context);
        assert_eq!(output.metadata["commit"], "0123abc");
        assert_eq!(output.provenance["commit"].method, Strategy::Api);
        let refs = output.metadata["external_references"].as_array().unwrap();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[2]["url"], "https://huggingface.co/acme/widget/commit/0123abc");
    }

    #[test]
    fn test_legacy_mode_has_no_provenance() {
        let output = MetadataExtractor::legacy().extract(&ExtractionContext::builder("acme/widget").build());
        assert_eq!(output.mode, ExtractionMode::Legacy);
        assert!(output.provenance.is_empty());
        assert_eq!(output.metadata["license"], "NOASSERTION");
    }
}
