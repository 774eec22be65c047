//! Field classification and provenance type definitions.
//!
//! These types are shared by the registry, the extraction engine and the
//! completeness scorer. All of them serialize with [`serde`] so provenance
//! maps and reports can be handed to a document assembler as plain JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat mapping of field name to resolved value.
///
/// Fields that could not be resolved are never present in this map.
pub type MetadataMap = BTreeMap<String, Value>;

/// Mapping of field name to the provenance of its value for one run.
pub type ProvenanceMap = BTreeMap<String, ExtractionResult>;

/// Criticality classification of a field.
///
/// Drives penalty calculation and recommendation priority in the scorer.
/// A field without a tier is [`Supplementary`](Tier::Supplementary).
/// Unrecognized tier names deserialize as [`Unknown`](Tier::Unknown): such
/// fields still count toward their category but are never reported as
/// missing.
///
/// # Examples
///
/// ```
/// use aibom_core::Tier;
///
/// let tier: Tier = serde_json::from_str("\"critical\"").unwrap();
/// assert_eq!(tier, Tier::Critical);
/// assert_eq!(tier.glyph(), "★★★");
///
/// let unknown: Tier = serde_json::from_str("\"optional\"").unwrap();
/// assert_eq!(unknown, Tier::Unknown);
/// assert_eq!(unknown.glyph(), "★");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    Important,
    #[default]
    Supplementary,
    #[serde(other)]
    Unknown,
}

impl Tier {
    /// All recognized tiers, highest criticality first.
    pub const ALL: [Tier; 3] = [Tier::Critical, Tier::Important, Tier::Supplementary];

    /// Lowercase catalog name of the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Supplementary => "supplementary",
            Self::Unknown => "unknown",
        }
    }

    /// Star glyph used in field checklists.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Critical => "★★★",
            Self::Important => "★★",
            Self::Supplementary | Self::Unknown => "★",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence attached to an extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Direct platform or structured-card data.
    High,
    /// Inferred from reliable patterns or defaults.
    Medium,
    /// Weak inference.
    Low,
    /// Placeholder or unresolved.
    None,
}

impl Confidence {
    /// Returns `true` if a value with this confidence counts as present
    /// when scoring. Only `medium` and `high` qualify.
    pub fn counts_as_present(self) -> bool {
        matches!(self, Self::High | Self::Medium)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an extracted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Platform API record.
    Api,
    /// Structured model-card front-matter.
    ModelCard,
    /// Downloaded auxiliary configuration file.
    ConfigFile,
    /// Free-text pattern match over the README.
    ReadmeText,
    /// Derived from the subject identifier or fixed defaults.
    Inference,
    /// Secondary retrieval of a repository file.
    RepositoryFile,
    /// Static fallback value.
    Placeholder,
    /// Nothing resolved.
    None,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::ModelCard => "model_card",
            Self::ConfigFile => "config_file",
            Self::ReadmeText => "readme_text",
            Self::Inference => "inference",
            Self::RepositoryFile => "repository_file",
            Self::Placeholder => "placeholder",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of the resolution strategy that produced a value.
///
/// Serialized with the method names recorded in provenance maps
/// (`api_direct`, `model_card_yaml`, ...).
///
/// # Examples
///
/// ```
/// use aibom_core::{Confidence, DataSource, Strategy};
///
/// assert_eq!(Strategy::Api.tag(), (DataSource::Api, Confidence::High));
/// assert_eq!(Strategy::Fallback.method_name(), "fallback_placeholder");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "api_direct")]
    Api,
    #[serde(rename = "model_card_yaml")]
    ModelCard,
    #[serde(rename = "config_file")]
    ConfigFile,
    #[serde(rename = "text_pattern")]
    TextPattern,
    #[serde(rename = "intelligent_inference")]
    Inference,
    #[serde(rename = "license_file")]
    LicenseFile,
    #[serde(rename = "summarization")]
    Enrichment,
    #[serde(rename = "fallback_placeholder")]
    Fallback,
    #[serde(rename = "extraction_failed")]
    Unresolved,
}

impl Strategy {
    /// Resolution order of the extraction chain.
    pub const CHAIN: [Strategy; 8] = [
        Strategy::Api,
        Strategy::ModelCard,
        Strategy::ConfigFile,
        Strategy::TextPattern,
        Strategy::Inference,
        Strategy::LicenseFile,
        Strategy::Enrichment,
        Strategy::Fallback,
    ];

    pub fn method_name(self) -> &'static str {
        match self {
            Self::Api => "api_direct",
            Self::ModelCard => "model_card_yaml",
            Self::ConfigFile => "config_file",
            Self::TextPattern => "text_pattern",
            Self::Inference => "intelligent_inference",
            Self::LicenseFile => "license_file",
            Self::Enrichment => "summarization",
            Self::Fallback => "fallback_placeholder",
            Self::Unresolved => "extraction_failed",
        }
    }

    /// Fixed `(source, confidence)` pair recorded when this strategy wins.
    pub fn tag(self) -> (DataSource, Confidence) {
        match self {
            Self::Api => (DataSource::Api, Confidence::High),
            Self::ModelCard => (DataSource::ModelCard, Confidence::High),
            Self::ConfigFile => (DataSource::ConfigFile, Confidence::High),
            Self::TextPattern => (DataSource::ReadmeText, Confidence::Medium),
            Self::Inference => (DataSource::Inference, Confidence::Medium),
            Self::LicenseFile => (DataSource::RepositoryFile, Confidence::Medium),
            Self::Enrichment => (DataSource::Inference, Confidence::Medium),
            Self::Fallback => (DataSource::Placeholder, Confidence::None),
            Self::Unresolved => (DataSource::None, Confidence::None),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Provenance of one field for one extraction run.
///
/// # Examples
///
/// ```
/// use aibom_core::{Confidence, DataSource, ExtractionResult, Strategy};
/// use serde_json::json;
///
/// let result = ExtractionResult::resolved(json!("MIT"), Strategy::ModelCard, vec![Strategy::Api]);
/// assert_eq!(result.source, DataSource::ModelCard);
/// assert_eq!(result.confidence, Confidence::High);
/// assert!(result.is_resolved());
///
/// let missing = ExtractionResult::unresolved(Strategy::CHAIN.to_vec());
/// assert_eq!(missing.confidence, Confidence::None);
/// assert!(!missing.is_resolved());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Resolved value, `None` when no strategy produced one.
    pub value: Option<Value>,
    pub source: DataSource,
    pub confidence: Confidence,
    /// Strategy that produced the value.
    pub method: Strategy,
    /// RFC 3339 UTC timestamp of the resolution.
    pub timestamp: String,
    /// Strategies attempted before `method`, in order.
    #[serde(default)]
    pub fallback_chain: Vec<Strategy>,
}

impl ExtractionResult {
    /// Creates a record for a value produced by `method`, tagged with the
    /// strategy's fixed source and confidence.
    pub fn resolved(value: Value, method: Strategy, fallback_chain: Vec<Strategy>) -> Self {
        let (source, confidence) = method.tag();
        Self {
            value: Some(value),
            source,
            confidence,
            method,
            timestamp: now_rfc3339(),
            fallback_chain,
        }
    }

    /// Creates a record for a field no strategy could resolve.
    pub fn unresolved(fallback_chain: Vec<Strategy>) -> Self {
        let (source, confidence) = Strategy::Unresolved.tag();
        Self {
            value: None,
            source,
            confidence,
            method: Strategy::Unresolved,
            timestamp: now_rfc3339(),
            fallback_chain,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(
                f,
                "{value} (source: {}, confidence: {})",
                self.source, self.confidence
            ),
            None => write!(f, "<unresolved> (source: {})", self.source),
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tier_serde_matches_as_str() {
        for tier in Tier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.as_str()));
        }
    }

    #[test]
    fn test_unrecognized_tier_is_unknown() {
        let tier: Tier = serde_json::from_str("\"critcal\"").unwrap();
        assert_eq!(tier, Tier::Unknown);
        assert_eq!(tier.to_string(), "unknown");
        assert!(!Tier::ALL.contains(&tier));
    }

    #[test]
    fn test_only_medium_and_high_count_as_present() {
        assert!(Confidence::High.counts_as_present());
        assert!(Confidence::Medium.counts_as_present());
        assert!(!Confidence::Low.counts_as_present());
        assert!(!Confidence::None.counts_as_present());
    }

    #[test]
    fn test_strategy_serializes_as_method_name() {
        for strategy in Strategy::CHAIN {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.method_name()));
        }
    }

    #[test]
    fn test_chain_tags() {
        let tags: Vec<_> = Strategy::CHAIN.iter().map(|s| s.tag()).collect();
        assert_eq!(
            tags,
            vec![
                (DataSource::Api, Confidence::High),
                (DataSource::ModelCard, Confidence::High),
                (DataSource::ConfigFile, Confidence::High),
                (DataSource::ReadmeText, Confidence::Medium),
                (DataSource::Inference, Confidence::Medium),
                (DataSource::RepositoryFile, Confidence::Medium),
                (DataSource::Inference, Confidence::Medium),
                (DataSource::Placeholder, Confidence::None),
            ]
        );
    }

    #[test]
    fn test_extraction_result_roundtrips_through_json() {
        let result = ExtractionResult::resolved(
            json!(["squad", "glue"]),
            Strategy::ModelCard,
            vec![Strategy::Api],
        );
        let raw = serde_json::to_string(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, result);
        assert!(raw.contains("\"method\":\"model_card_yaml\""));
        assert!(raw.contains("\"source\":\"model_card\""));
    }
}
