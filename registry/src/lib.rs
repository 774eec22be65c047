//! Declarative field catalog for AIBOM extraction and scoring.
//!
//! The catalog is a JSON document with a mandatory `fields` section and an
//! optional `scoring_config` section. Loading is all-or-nothing; derived
//! views (scoring weights, profiles, validation messages) are computed once
//! and degrade to built-in defaults when their section is malformed.
//!
//! # Quick start
//!
//! ```
//! use aibom_core::Tier;
//! use aibom_registry::FieldRegistry;
//!
//! let registry = FieldRegistry::from_json_str(r#"{
//!     "fields": {
//!         "bomFormat": {
//!             "tier": "critical", "weight": 4,
//!             "category": "required_fields", "jsonpath": "$.bomFormat"
//!         }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(registry.fields_by_tier(Tier::Critical), vec!["bomFormat"]);
//! assert_eq!(registry.scoring_config().category_weight("required_fields"), 20.0);
//! assert_eq!(registry.profiles().len(), 3);
//! ```

mod catalog;
mod config;
mod error;
mod integrity;
mod registry;

pub use catalog::{ConfigKey, ExtractionHints, FieldDefinition, MatchPolicy, ValidationMessage};
pub use config::{AlgorithmConfig, CompletenessProfile, ScoringConfig, default_profiles};
pub use error::{RegistryError, Result};
pub use integrity::IntegrityReport;
pub use registry::FieldRegistry;
