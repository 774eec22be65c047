//! Serializable scoring output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use aibom_core::Tier;

use crate::validation::ValidationReport;

/// Result of one [`CompletenessScorer::score`](crate::CompletenessScorer::score) call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Post-penalty score, bounded to `[0, 100]`.
    pub total_score: f64,
    /// Sum of category scores before penalties.
    pub subtotal_score: f64,
    pub section_scores: BTreeMap<String, f64>,
    /// Point budget of each category.
    pub max_scores: BTreeMap<String, f64>,
    /// Field name to `"✔ ★★★"`-style presence marker.
    pub field_checklist: BTreeMap<String, String>,
    pub missing_fields: MissingFields,
    pub completeness_profile: ProfileOutcome,
    pub penalty_applied: bool,
    pub penalty_reason: Option<String>,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

/// Missing field names partitioned by tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFields {
    pub critical: Vec<String>,
    pub important: Vec<String>,
    pub supplementary: Vec<String>,
}

impl MissingFields {
    /// Records a missing field; fields of an unknown tier are not listed.
    pub fn push(&mut self, tier: Tier, field: impl Into<String>) {
        let bucket = match tier {
            Tier::Critical => &mut self.critical,
            Tier::Important => &mut self.important,
            Tier::Supplementary => &mut self.supplementary,
            Tier::Unknown => return,
        };
        bucket.push(field.into());
    }

    pub fn get(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Critical => &self.critical,
            Tier::Important => &self.important,
            Tier::Supplementary => &self.supplementary,
            Tier::Unknown => &[],
        }
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.important.len() + self.supplementary.len()
    }
}

/// Highest completeness profile the document satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOutcome {
    /// `Advanced`, `Standard`, `Basic`, or `incomplete`.
    pub name: String,
    pub description: String,
    pub satisfied: bool,
}

impl ProfileOutcome {
    pub(crate) fn incomplete() -> Self {
        Self {
            name: "incomplete".to_string(),
            description: "Does not satisfy any completeness profile".to_string(),
            satisfied: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Critical => Self::High,
            Tier::Important => Self::Medium,
            Tier::Supplementary | Tier::Unknown => Self::Low,
        }
    }
}

/// Suggested fix for one missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub field: String,
    pub message: String,
    pub recommendation: String,
    /// Tier multiplier times the field's catalog weight.
    pub impact: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_buckets() {
        let mut missing = MissingFields::default();
        missing.push(Tier::Critical, "name");
        missing.push(Tier::Supplementary, "paper");
        missing.push(Tier::Supplementary, "website");
        assert_eq!(missing.get(Tier::Critical), ["name".to_string()]);
        assert!(missing.get(Tier::Important).is_empty());
        assert_eq!(missing.total(), 3);

        missing.push(Tier::Unknown, "notes");
        assert_eq!(missing.total(), 3);
        assert!(missing.get(Tier::Unknown).is_empty());
    }

    #[test]
    fn test_validation_omitted_when_absent() {
        let report = ScoreReport {
            total_score: 0.0,
            subtotal_score: 0.0,
            section_scores: BTreeMap::new(),
            max_scores: BTreeMap::new(),
            field_checklist: BTreeMap::new(),
            missing_fields: MissingFields::default(),
            completeness_profile: ProfileOutcome::incomplete(),
            penalty_applied: false,
            penalty_reason: None,
            recommendations: Vec::new(),
            validation: None,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("validation").is_none());
        assert_eq!(value["completeness_profile"]["name"], "incomplete");
        assert!(value["penalty_reason"].is_null());
    }
}
