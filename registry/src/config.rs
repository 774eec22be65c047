//! Global scoring configuration carried by the catalog.
//!
//! # Example catalog section
//!
//! ```json
//! "scoring_config": {
//!   "tier_weights": { "critical": 3, "important": 2, "supplementary": 1 },
//!   "category_weights": {
//!     "required_fields": 20,
//!     "metadata": 20,
//!     "component_basic": 20,
//!     "component_model_card": 30,
//!     "external_references": 10
//!   },
//!   "scoring_profiles": {
//!     "basic": {
//!       "description": "Minimal fields required for identification",
//!       "required_fields": ["bomFormat", "specVersion"],
//!       "minimum_score": 40
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Tier multipliers and per-category point budgets.
///
/// Catalog tables are merged over the built-in defaults: a partial table
/// overrides only the keys it names.
///
/// # Examples
///
/// ```
/// use aibom_registry::ScoringConfig;
///
/// let config: ScoringConfig = serde_json::from_str(r#"{ "category_weights": { "metadata": 50 } }"#).unwrap();
/// assert_eq!(config.category_weight("metadata"), 50.0);
/// assert_eq!(config.category_weight("component_basic"), 20.0);
/// assert_eq!(config.category_weight("other"), 0.0);
/// assert_eq!(config.tier_weights["critical"], 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(
        default = "default_tier_weights",
        deserialize_with = "deserialize_tier_weights"
    )]
    pub tier_weights: BTreeMap<String, f64>,
    #[serde(
        default = "default_category_weights",
        deserialize_with = "deserialize_category_weights"
    )]
    pub category_weights: BTreeMap<String, f64>,
    /// Descriptive only; the scorer always computes a category-normalized
    /// weighted sum.
    #[serde(default, rename = "algorithm_config")]
    pub algorithm: AlgorithmConfig,
}

/// Scoring algorithm descriptor carried in `scoring_config.algorithm_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    #[serde(default = "default_algorithm_type", rename = "type")]
    pub kind: String,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    #[serde(default = "default_normalization")]
    pub normalization: String,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            kind: default_algorithm_type(),
            max_score: default_max_score(),
            normalization: default_normalization(),
        }
    }
}

impl ScoringConfig {
    /// Point budget of `category`; categories without a budget score zero.
    pub fn category_weight(&self, category: &str) -> f64 {
        self.category_weights.get(category).copied().unwrap_or(0.0)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tier_weights: default_tier_weights(),
            category_weights: default_category_weights(),
            algorithm: AlgorithmConfig::default(),
        }
    }
}

/// A named completeness bar: required fields plus a minimum score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessProfile {
    #[serde(skip_deserializing, default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,
}

impl CompletenessProfile {
    pub fn new(
        name: &str,
        description: &str,
        required_fields: &[&str],
        minimum_score: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required_fields: required_fields.iter().map(|f| f.to_string()).collect(),
            minimum_score,
        }
    }
}

const BASIC_FIELDS: &[&str] = &["bomFormat", "specVersion", "serialNumber", "version", "name"];

const STANDARD_FIELDS: &[&str] = &[
    "bomFormat",
    "specVersion",
    "serialNumber",
    "version",
    "name",
    "downloadLocation",
    "primaryPurpose",
    "suppliedBy",
];

const ADVANCED_FIELDS: &[&str] = &[
    "bomFormat",
    "specVersion",
    "serialNumber",
    "version",
    "name",
    "downloadLocation",
    "primaryPurpose",
    "suppliedBy",
    "type",
    "purl",
    "description",
    "licenses",
    "hyperparameter",
    "limitation",
    "energyConsumption",
    "safetyRiskAssessment",
    "typeOfModel",
];

/// Built-in profiles used when the catalog defines none.
pub fn default_profiles() -> BTreeMap<String, CompletenessProfile> {
    [
        CompletenessProfile::new(
            "basic",
            "Minimal fields required for identification",
            BASIC_FIELDS,
            40.0,
        ),
        CompletenessProfile::new(
            "standard",
            "Comprehensive fields for proper documentation",
            STANDARD_FIELDS,
            70.0,
        ),
        CompletenessProfile::new(
            "advanced",
            "Extensive documentation for maximum transparency",
            ADVANCED_FIELDS,
            85.0,
        ),
    ]
    .into_iter()
    .map(|profile| (profile.name.clone(), profile))
    .collect()
}

fn default_tier_weights() -> BTreeMap<String, f64> {
    [("critical", 3.0), ("important", 2.0), ("supplementary", 1.0)]
        .into_iter()
        .map(|(tier, weight)| (tier.to_string(), weight))
        .collect()
}

fn default_category_weights() -> BTreeMap<String, f64> {
    [
        ("required_fields", 20.0),
        ("metadata", 20.0),
        ("component_basic", 20.0),
        ("component_model_card", 30.0),
        ("external_references", 10.0),
    ]
    .into_iter()
    .map(|(category, weight)| (category.to_string(), weight))
    .collect()
}

fn merged_over(
    mut defaults: BTreeMap<String, f64>,
    overrides: BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    defaults.extend(overrides);
    defaults
}

fn deserialize_tier_weights<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::deserialize(deserializer)?;
    Ok(merged_over(default_tier_weights(), overrides))
}

fn deserialize_category_weights<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::deserialize(deserializer)?;
    Ok(merged_over(default_category_weights(), overrides))
}

fn default_minimum_score() -> f64 {
    50.0
}

fn default_algorithm_type() -> String {
    "weighted_sum".to_string()
}

fn default_max_score() -> f64 {
    100.0
}

fn default_normalization() -> String {
    "category_based".to_string()
}
