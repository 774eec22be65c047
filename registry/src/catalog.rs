//! Field definitions as declared in the catalog's `fields` section.
//!
//! # Example catalog entry
//!
//! ```json
//! "license": {
//!   "tier": "critical",
//!   "weight": 4,
//!   "category": "component_basic",
//!   "jsonpath": "$.components[0].licenses",
//!   "fallback_value": "NOASSERTION",
//!   "validation_message": {
//!     "missing": "Missing critical field: license",
//!     "recommendation": "Declare an SPDX license identifier in the model card"
//!   },
//!   "extraction": { "pattern_category": "license", "match_policy": "longest" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibom_core::Tier;

/// One metadata field of the catalog.
///
/// # Examples
///
/// ```
/// use aibom_core::Tier;
/// use aibom_registry::FieldDefinition;
///
/// let def: FieldDefinition = serde_json::from_str(
///     r#"{ "tier": "important", "category": "metadata", "jsonpath": "$.metadata.timestamp" }"#,
/// ).unwrap();
/// assert_eq!(def.tier, Tier::Important);
/// assert_eq!(def.weight, 1);
/// assert_eq!(def.path.as_deref(), Some("$.metadata.timestamp"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name, taken from the catalog key.
    #[serde(skip_deserializing, default)]
    pub name: String,
    #[serde(default)]
    pub tier: Tier,
    /// Ordering hint within a tier.
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_category")]
    pub category: String,
    /// Path expression locating the field in the assembled document.
    #[serde(default, rename = "jsonpath", alias = "path")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<ValidationMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionHints>,
}

impl FieldDefinition {
    /// Creates a definition with default weight and no path.
    pub fn new(name: impl Into<String>, tier: Tier, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tier,
            weight: default_weight(),
            category: category.into(),
            path: None,
            fallback_value: None,
            validation_message: None,
            extraction: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_fallback(mut self, value: Value) -> Self {
        self.fallback_value = Some(value);
        self
    }

    pub fn with_extraction(mut self, hints: ExtractionHints) -> Self {
        self.extraction = Some(hints);
        self
    }
}

/// Message templates shown when a field is missing.
///
/// Either text may be omitted in the catalog; the registry fills in generic
/// wording for the missing part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    #[serde(default)]
    pub missing: String,
    #[serde(default)]
    pub recommendation: String,
}

/// Data-only strategy parameters for a field.
///
/// Each hint overrides the engine's built-in table entry for the same
/// strategy, which lets new fields be extracted without code changes when
/// their access pattern matches an existing strategy shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionHints {
    /// Card data keys tried in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_keys: Vec<String>,
    /// Auxiliary configuration record lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigKey>,
    /// Free-text pattern category (`license`, `datasets`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_category: Option<String>,
    /// Conflict resolution when several free-text matches survive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_policy: Option<MatchPolicy>,
}

/// `(record, key)` lookup into a downloaded configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigKey {
    /// Record file name, e.g. `config.json`.
    pub record: String,
    pub key: String,
}

impl ConfigKey {
    pub fn new(record: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            key: key.into(),
        }
    }
}

/// How surviving free-text matches collapse into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Longest match; for single short tokens such as license names.
    Longest,
    /// First match; for categorical single values.
    First,
    /// Sole match as a scalar, several matches as a list.
    Collect,
}

fn default_weight() -> u32 {
    1
}

fn default_category() -> String {
    "unknown".to_string()
}
