//! Fixed-layer extraction used when no field catalog is available.
//!
//! Five layers run in order over the same [`ExtractionContext`]:
//!
//! 1. platform record and card data,
//! 2. configuration records and repository license files,
//! 3. README pattern matching,
//! 4. external references,
//! 5. defaults for `author` and `license`.
//!
//! Later layers only fill keys that earlier layers left empty, except the
//! external references which are always rebuilt. No provenance is recorded
//! in this mode.

use serde_json::{Value, json};
use tracing::debug;

use aibom_core::{MetadataMap, is_truthy};

use crate::context::ExtractionContext;
use crate::references::external_references;
use crate::strategies::license_file::detect_license_from_files;
use crate::strategies::pattern::{CATEGORIES, default_policy, find_matches, patterns, resolve_matches};

const UNKNOWN_AUTHOR: &str = "unknown";
const NO_ASSERTION: &str = "NOASSERTION";

/// Card data keys copied verbatim by layer 1.
const CARD_KEYS: &[&str] = &["license", "language", "library_name", "base_model", "datasets"];

/// Runs all legacy layers and returns the flat metadata map.
pub fn extract_legacy(context: &ExtractionContext) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    structured_layer(context, &mut metadata);
    repository_layer(context, &mut metadata);
    text_layer(context, &mut metadata);
    reference_layer(context, &mut metadata);
    defaults_layer(context, &mut metadata);
    debug!(fields = metadata.len(), "legacy extraction finished");
    metadata
}

fn structured_layer(context: &ExtractionContext, metadata: &mut MetadataMap) {
    if let Some(info) = context.model_info() {
        let author = info
            .author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_author(context));
        metadata.insert("author".into(), json!(author));

        let id = info.model_id.as_deref().unwrap_or(context.model_id());
        let name = id.rsplit('/').next().unwrap_or(id);
        metadata.insert("name".into(), json!(name));
        metadata.insert("tags".into(), json!(info.tags.clone().unwrap_or_default()));
        set(metadata, "pipeline_tag", info.pipeline_tag.as_ref().map(|tag| json!(tag)));
        metadata.insert("downloads".into(), json!(info.downloads.unwrap_or(0)));
        set(metadata, "commit", info.sha.as_ref().map(|sha| json!(sha)));
    }

    if let Some(card) = context.card().filter(|card| !card.data.is_empty()) {
        for key in CARD_KEYS {
            set(metadata, key, card.get(key).cloned());
        }
        let description = card
            .get("model_summary")
            .filter(|value| is_truthy(value))
            .or_else(|| card.get("description"))
            .cloned();
        set(metadata, "description", description);
    }

    let purpose = metadata
        .get("pipeline_tag")
        .cloned()
        .unwrap_or_else(|| json!("text-generation"));
    metadata.insert("primaryPurpose".into(), purpose);
    let supplier = metadata
        .get("author")
        .cloned()
        .unwrap_or_else(|| json!(UNKNOWN_AUTHOR));
    metadata.insert("suppliedBy".into(), supplier);
    metadata.insert("typeOfModel".into(), json!("transformer"));
}

fn repository_layer(context: &ExtractionContext, metadata: &mut MetadataMap) {
    if let Some(config) = context.config("config.json") {
        set(metadata, "model_type", config.get("model_type").cloned());
        metadata.insert(
            "architectures".into(),
            config.get("architectures").cloned().unwrap_or_else(|| json!([])),
        );
        set(metadata, "vocab_size", config.get("vocab_size").cloned());
    }
    if let Some(tokenizer) = context.config("tokenizer_config.json") {
        set(metadata, "tokenizer_class", tokenizer.get("tokenizer_class").cloned());
    }

    if !has_value(metadata, "license")
        && let Some(spdx) = context.files().and_then(detect_license_from_files)
    {
        metadata.insert("license".into(), json!(spdx));
    }
}

/// README pattern matches for the free-text categories.
///
/// Only keys still empty after the structured and repository layers are
/// filled. A pattern hit never overwrites platform, card or config data,
/// so a README sentence cannot replace a declared license.
fn text_layer(context: &ExtractionContext, metadata: &mut MetadataMap) {
    let Some(text) = context.readme() else {
        return;
    };
    for category in CATEGORIES {
        if has_value(metadata, category) {
            continue;
        }
        let Some(patterns) = patterns(category) else {
            continue;
        };
        let matches = find_matches(text, patterns);
        set(metadata, category, resolve_matches(&matches, default_policy(category)));
    }
}

fn reference_layer(context: &ExtractionContext, metadata: &mut MetadataMap) {
    let refs = external_references(context.model_id(), metadata);
    metadata.insert("external_references".into(), json!(refs));
}

fn defaults_layer(context: &ExtractionContext, metadata: &mut MetadataMap) {
    if !has_value(metadata, "author") {
        metadata.insert("author".into(), json!(default_author(context)));
    }
    if !has_value(metadata, "license") {
        metadata.insert("license".into(), json!(NO_ASSERTION));
    }
}

/// Namespace of the identifier, or `unknown` for bare names.
fn default_author(context: &ExtractionContext) -> String {
    context.namespace().unwrap_or(UNKNOWN_AUTHOR).to_string()
}

fn has_value(metadata: &MetadataMap, key: &str) -> bool {
    metadata.get(key).is_some_and(is_truthy)
}

/// Inserts `value` unless it is absent or JSON null.
fn set(metadata: &mut MetadataMap, key: &str, value: Option<Value>) {
    if let Some(value) = value.filter(|value| !value.is_null()) {
        metadata.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::ModelInfo;
    use crate::source::InMemoryFiles;

    #[test]
    fn test_bare_context_gets_defaults() {
        let context = ExtractionContext::builder("widget").build();
        let metadata = extract_legacy(&context);
        assert_eq!(metadata["author"], "unknown");
        assert_eq!(metadata["license"], "NOASSERTION");
        assert_eq!(metadata["primaryPurpose"], "text-generation");
        assert_eq!(metadata["suppliedBy"], "unknown");
        assert_eq!(metadata["typeOfModel"], "transformer");
        assert_eq!(metadata["external_references"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_structured_layer_reads_record_and_card() {
        let context = ExtractionContext::builder("acme/widget")
            .model_info(ModelInfo {
                pipeline_tag: Some("fill-mask".into()),
                sha: Some("abc".into()),
                ..Default::default()
            })
            .readme("---\nlicense: apache-2.0\ndatasets:\n  - c4\nmodel_summary: A widget.\n---\nbody\n")
            .build();
        let metadata = extract_legacy(&context);
        assert_eq!(metadata["author"], "acme");
        assert_eq!(metadata["name"], "widget");
        assert_eq!(metadata["downloads"], 0);
        assert_eq!(metadata["primaryPurpose"], "fill-mask");
        assert_eq!(metadata["license"], "apache-2.0");
        assert_eq!(metadata["description"], "A widget.");
        // website, files, commit, dataset
        assert_eq!(metadata["external_references"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_repository_layer_reads_configs_and_license_file() {
        let files = InMemoryFiles::new()
            .with_file("config.json", r#"{"model_type": "llama", "architectures": ["LlamaForCausalLM"]}"#)
            .with_file("tokenizer_config.json", r#"{"tokenizer_class": "LlamaTokenizer"}"#)
            .with_file("LICENSE", "MIT License\n\nPermission is hereby granted...");
        let context = ExtractionContext::builder("acme/widget")
            .files(Arc::new(files))
            .build();
        let metadata = extract_legacy(&context);
        assert_eq!(metadata["model_type"], "llama");
        assert_eq!(metadata["architectures"], json!(["LlamaForCausalLM"]));
        assert_eq!(metadata["tokenizer_class"], "LlamaTokenizer");
        assert_eq!(metadata["license"], "MIT");
        assert!(!metadata.contains_key("vocab_size"));
    }

    #[test]
    fn test_text_layer_fills_only_missing_keys() {
        let context = ExtractionContext::builder("acme/widget")
            .readme("---\nlicense: mit\n---\nLicense: Apache License 2.0\n\nTrained on: openwebtext and more.\n")
            .build();
        let metadata = extract_legacy(&context);
        assert_eq!(metadata["license"], "mit");
        assert_eq!(metadata["datasets"], "openwebtext");
    }
}
