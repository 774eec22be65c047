//! Registry-driven metadata extraction for AI models.
//!
//! Given an [`ExtractionContext`] (platform record, README with card
//! front-matter, configuration records, optional repository file access),
//! [`MetadataExtractor`] resolves every field of a
//! [`FieldRegistry`](aibom_registry::FieldRegistry) through an ordered
//! chain of strategies and records where each value came from.
//!
//! # Strategy chain
//!
//! | # | strategy | source | confidence |
//! |---|----------|--------|------------|
//! | 1 | platform API record | `api` | high |
//! | 2 | card front-matter | `model_card` | high |
//! | 3 | configuration records | `config_file` | high |
//! | 4 | README patterns | `readme_text` | medium |
//! | 5 | inference rules | `inference` | medium |
//! | 6 | license file probe | `repository_file` | medium |
//! | 7 | description enrichment (opt-in) | `inference` | medium |
//! | 8 | placeholder fallback | `placeholder` | none |
//!
//! Non-informative values such as `"other"` or `"unknown"` are rejected so
//! later strategies get a chance.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//!
//! use aibom_core::{DataSource, Strategy};
//! use aibom_extract::{ExtractionContext, MetadataExtractor, ModelInfo};
//! use aibom_registry::FieldRegistry;
//! use serde_json::json;
//!
//! let registry = FieldRegistry::from_json_str(r#"{
//!     "fields": {
//!         "license": { "tier": "critical", "weight": 4, "category": "component_basic" }
//!     }
//! }"#).unwrap();
//!
//! let info = ModelInfo {
//!     card_data: Some([("license".to_string(), json!("other"))].into_iter().collect()),
//!     ..Default::default()
//! };
//! let context = ExtractionContext::builder("https://huggingface.co/acme/widget")
//!     .model_info(info)
//!     .readme("# Widget\n\nLicense: Apache-2.0\n")
//!     .build();
//!
//! let output = MetadataExtractor::new(Arc::new(registry)).extract(&context);
//! assert_eq!(output.metadata["license"], "Apache-2.0");
//! let record = &output.provenance["license"];
//! assert_eq!(record.source, DataSource::ReadmeText);
//! assert_eq!(record.fallback_chain, vec![Strategy::Api, Strategy::ModelCard]);
//! ```

mod context;
mod engine;
pub mod enrich;
mod error;
pub mod legacy;
pub mod references;
mod source;
pub mod strategies;

pub use context::{
    CONFIG_RECORDS, ExtractionContext, ExtractionContextBuilder, ModelCard, ModelInfo,
    normalize_model_id, split_front_matter,
};
pub use engine::{ExtractionMode, ExtractionOutput, MetadataExtractor};
pub use enrich::{MAX_SUMMARY_CHARS, NoSummarizer, Summarizer, summarize_description};
pub use error::{FetchError, Result};
pub use references::{ExternalReference, ReferenceKind};
pub use source::{DirectoryFiles, InMemoryFiles, RepositoryFiles};
