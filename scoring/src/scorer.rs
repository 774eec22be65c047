//! Completeness scoring against the field catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use aibom_core::{ProvenanceMap, Tier, resolve};
use aibom_registry::{CompletenessProfile, FieldRegistry, ScoringConfig};

use crate::detect::find_field;
use crate::report::{MissingFields, Priority, ProfileOutcome, Recommendation, ScoreReport};
use crate::validation::{SchemaValidator, ValidationReport, ai_requirement_issues};

/// Profiles in reporting precedence, with their display names.
const PROFILE_PRECEDENCE: &[(&str, &str)] = &[
    ("advanced", "Advanced"),
    ("standard", "Standard"),
    ("basic", "Basic"),
];

/// Supplementary fields listed in recommendations.
const MAX_SUPPLEMENTARY_RECOMMENDATIONS: usize = 5;

/// Penalty multiplier applied to the subtotal, with its reason.
struct Penalty {
    factor: f64,
    reasons: Vec<&'static str>,
}

impl Penalty {
    fn for_missing(missing: &MissingFields) -> Self {
        let mut factor = 1.0;
        let mut reasons = Vec::new();

        let critical = missing.critical.len();
        if critical > 3 {
            factor *= 0.8;
            reasons.push("Multiple critical fields missing");
        } else if critical >= 2 {
            factor *= 0.9;
            reasons.push("Some critical fields missing");
        }

        if missing.important.len() >= 5 {
            factor *= 0.95;
            reasons.push("Several important fields missing");
        }
        Self { factor, reasons }
    }

    fn reason(&self) -> Option<String> {
        (!self.reasons.is_empty()).then(|| self.reasons.join(" and "))
    }
}

#[derive(Default)]
struct CategoryCount {
    present: usize,
    total: usize,
}

/// Scores assembled documents for completeness.
///
/// Holds the catalog by shared handle; scoring is a pure function of the
/// document, the optional provenance map and the catalog.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use aibom_registry::FieldRegistry;
/// use aibom_scoring::CompletenessScorer;
/// use serde_json::json;
///
/// let registry = FieldRegistry::from_value(json!({
///     "fields": {
///         "bomFormat": {
///             "tier": "critical", "weight": 4,
///             "category": "required_fields", "jsonpath": "$.bomFormat"
///         }
///     }
/// })).unwrap();
///
/// let scorer = CompletenessScorer::new(Arc::new(registry));
/// let report = scorer.score(&json!({}), None);
/// assert_eq!(report.section_scores["required_fields"], 0.0);
/// assert_eq!(report.max_scores["required_fields"], 20.0);
/// assert_eq!(report.missing_fields.critical, vec!["bomFormat"]);
/// assert_eq!(report.completeness_profile.name, "incomplete");
///
/// let report = scorer.score(&json!({ "bomFormat": "CycloneDX" }), None);
/// assert_eq!(report.total_score, 20.0);
/// ```
pub struct CompletenessScorer {
    registry: Option<Arc<FieldRegistry>>,
    validator: Option<Box<dyn SchemaValidator>>,
}

impl CompletenessScorer {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self {
            registry: Some(registry),
            validator: None,
        }
    }

    /// Scorer with no catalog: no fields are classified, so every document
    /// scores zero and is `incomplete`.
    pub fn without_registry() -> Self {
        Self {
            registry: None,
            validator: None,
        }
    }

    /// Attaches schema validation; reports then carry a `validation`
    /// section.
    #[must_use]
    pub fn with_validator(mut self, validator: impl SchemaValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn registry(&self) -> Option<&FieldRegistry> {
        self.registry.as_deref()
    }

    /// Presence check used for both category counts and profiles.
    ///
    /// Order: the field's catalog path; then its provenance entry, which
    /// decides alone when present (`high`/`medium` present, `low`/`none`
    /// absent); then the structural search.
    pub fn is_present(&self, document: &Value, field: &str, provenance: Option<&ProvenanceMap>) -> bool {
        if let Some(path) = self.registry().and_then(|registry| registry.field_path(field))
            && resolve(document, path).is_some()
        {
            return true;
        }
        if let Some(result) = provenance.and_then(|map| map.get(field)) {
            return result.confidence.counts_as_present();
        }
        find_field(document, field)
    }

    /// Scores `document`, optionally consulting extraction provenance.
    pub fn score(&self, document: &Value, provenance: Option<&ProvenanceMap>) -> ScoreReport {
        let default_config = ScoringConfig::default();
        let config = self
            .registry()
            .map_or(&default_config, FieldRegistry::scoring_config);
        let max_scores = config.category_weights.clone();

        let mut counts: BTreeMap<String, CategoryCount> = max_scores
            .keys()
            .map(|category| (category.clone(), CategoryCount::default()))
            .collect();
        let mut missing = MissingFields::default();
        let mut field_checklist = BTreeMap::new();

        let definitions = self.registry().map(FieldRegistry::field_definitions);
        for (name, definition) in definitions.into_iter().flatten() {
            let present = self.is_present(document, name, provenance);
            debug!(field = %name, present, "field checked");

            let count = counts.entry(definition.category.clone()).or_default();
            count.total += 1;
            if present {
                count.present += 1;
            } else {
                missing.push(definition.tier, name.clone());
            }
            let mark = if present { '✔' } else { '✘' };
            field_checklist.insert(name.clone(), format!("{mark} {}", definition.tier.glyph()));
        }

        let section_scores: BTreeMap<String, f64> = counts
            .iter()
            .map(|(category, count)| {
                let score = if count.total == 0 {
                    0.0
                } else {
                    round1(count.present as f64 / count.total as f64 * config.category_weight(category))
                };
                (category.clone(), score)
            })
            .collect();

        let subtotal_score = round1(section_scores.values().sum());
        let penalty = Penalty::for_missing(&missing);
        let total_score = round1(subtotal_score * penalty.factor).clamp(0.0, 100.0);

        let completeness_profile = self.determine_profile(document, total_score, provenance);
        let recommendations = self.recommendations(&missing, config);
        let validation = self.validator.as_ref().map(|validator| {
            let mut issues = validator.validate(document);
            issues.extend(ai_requirement_issues(document));
            ValidationReport::from_issues(issues)
        });

        info!(
            total = total_score,
            profile = %completeness_profile.name,
            missing = missing.total(),
            "document scored"
        );

        ScoreReport {
            total_score,
            subtotal_score,
            section_scores,
            max_scores,
            field_checklist,
            missing_fields: missing,
            completeness_profile,
            penalty_applied: penalty.factor < 1.0,
            penalty_reason: penalty.reason(),
            recommendations,
            validation,
        }
    }

    /// Highest profile, by fixed precedence, whose required fields are all
    /// present and whose minimum the post-penalty score meets.
    fn determine_profile(
        &self,
        document: &Value,
        total_score: f64,
        provenance: Option<&ProvenanceMap>,
    ) -> ProfileOutcome {
        let Some(profiles) = self.registry().map(FieldRegistry::profiles) else {
            return ProfileOutcome::incomplete();
        };
        let satisfied = |profile: &CompletenessProfile| {
            total_score >= profile.minimum_score
                && profile
                    .required_fields
                    .iter()
                    .all(|field| self.is_present(document, field, provenance))
        };

        PROFILE_PRECEDENCE
            .iter()
            .find_map(|(key, display)| {
                let profile = profiles.get(*key)?;
                satisfied(profile).then(|| ProfileOutcome {
                    name: (*display).to_string(),
                    description: profile.description.clone(),
                    satisfied: true,
                })
            })
            .unwrap_or_else(ProfileOutcome::incomplete)
    }

    fn recommendations(&self, missing: &MissingFields, config: &ScoringConfig) -> Vec<Recommendation> {
        let Some(registry) = self.registry() else {
            return Vec::new();
        };
        let messages = registry.validation_messages();
        let impact = |tier: Tier, field: &str| {
            let tier_weight = config.tier_weights.get(tier.as_str()).copied().unwrap_or(1.0);
            let weight = registry.field(field).map_or(1, |def| def.weight);
            tier_weight * f64::from(weight)
        };

        let mut recommendations = Vec::new();
        for tier in [Tier::Critical, Tier::Important] {
            for field in missing.get(tier) {
                let (message, recommendation) = match messages.get(field) {
                    Some(declared) => (declared.missing.clone(), declared.recommendation.clone()),
                    None if tier == Tier::Critical => (
                        format!("Missing critical field: {field}"),
                        format!("Add {field} to improve documentation completeness"),
                    ),
                    None => (format!("Missing field: {field}"), format!("Consider adding {field}")),
                };
                recommendations.push(Recommendation {
                    priority: Priority::for_tier(tier),
                    field: field.clone(),
                    message,
                    recommendation,
                    impact: impact(tier, field),
                });
            }
        }
        recommendations.extend(
            missing
                .supplementary
                .iter()
                .take(MAX_SUPPLEMENTARY_RECOMMENDATIONS)
                .map(|field| Recommendation {
                    priority: Priority::Low,
                    field: field.clone(),
                    message: format!("Missing supplementary field: {field}"),
                    recommendation: format!("Consider adding {field}"),
                    impact: impact(Tier::Supplementary, field),
                }),
        );
        recommendations
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use aibom_core::{ExtractionResult, Strategy};
    use serde_json::json;

    use super::*;
    use crate::validation::RequiredKeysValidator;

    fn scorer(catalog: Value) -> CompletenessScorer {
        CompletenessScorer::new(Arc::new(FieldRegistry::from_value(catalog).unwrap()))
    }

    /// `critical` missing critical fields and `important` missing important
    /// fields, plus four present supplementary fields.
    fn penalty_catalog(critical: usize, important: usize) -> Value {
        let mut fields = serde_json::Map::new();
        for i in 0..critical {
            fields.insert(
                format!("crit{i}"),
                json!({ "tier": "critical", "weight": 4, "category": "required_fields", "jsonpath": format!("$.crit{i}") }),
            );
        }
        for i in 0..important {
            fields.insert(
                format!("imp{i}"),
                json!({ "tier": "important", "weight": 2, "category": "component_basic", "jsonpath": format!("$.imp{i}") }),
            );
        }
        for i in 0..4 {
            fields.insert(
                format!("sup{i}"),
                json!({ "tier": "supplementary", "weight": 1, "category": "component_basic", "jsonpath": format!("$.sup{i}") }),
            );
        }
        json!({ "fields": fields })
    }

    fn supplementary_present() -> Value {
        json!({ "sup0": 1, "sup1": 1, "sup2": 1, "sup3": 1 })
    }

    #[test]
    fn test_penalties_compose() {
        let report = scorer(penalty_catalog(4, 6)).score(&supplementary_present(), None);
        // component_basic: 4 of 10 present.
        assert_eq!(report.section_scores["component_basic"], 8.0);
        assert_eq!(report.subtotal_score, 8.0);
        assert_eq!(report.total_score, 6.1);
        assert!(report.penalty_applied);
        assert_eq!(
            report.penalty_reason.as_deref(),
            Some("Multiple critical fields missing and Several important fields missing")
        );
    }

    #[test]
    fn test_moderate_critical_penalty() {
        let report = scorer(penalty_catalog(2, 0)).score(&supplementary_present(), None);
        assert_eq!(report.subtotal_score, 20.0);
        assert_eq!(report.total_score, 18.0);
        assert_eq!(report.penalty_reason.as_deref(), Some("Some critical fields missing"));

        let report = scorer(penalty_catalog(1, 4)).score(&supplementary_present(), None);
        assert!(!report.penalty_applied);
        assert_eq!(report.penalty_reason, None);
    }

    #[test]
    fn test_total_is_clamped() {
        let report = scorer(json!({
            "scoring_config": { "category_weights": { "a": 80, "b": 80 } },
            "fields": {
                "x": { "tier": "critical", "weight": 1, "category": "a", "jsonpath": "$.x" },
                "y": { "tier": "critical", "weight": 1, "category": "b", "jsonpath": "$.y" }
            }
        }))
        .score(&json!({ "x": 1, "y": 1 }), None);
        assert_eq!(report.subtotal_score, 160.0);
        assert_eq!(report.total_score, 100.0);
    }

    #[test]
    fn test_partial_category_weights_keep_default_budgets() {
        let report = scorer(json!({
            "scoring_config": { "category_weights": { "required_fields": 60, "metadata": 20 } },
            "fields": {
                "bomFormat": { "tier": "critical", "weight": 4, "category": "required_fields", "jsonpath": "$.bomFormat" },
                "name": { "tier": "critical", "weight": 4, "category": "component_basic", "jsonpath": "$.components[0].name" }
            }
        }))
        .score(&json!({ "bomFormat": "CycloneDX", "components": [{ "name": "widget-7b" }] }), None);
        assert_eq!(report.max_scores["required_fields"], 60.0);
        assert_eq!(report.max_scores["component_basic"], 20.0);
        assert_eq!(report.max_scores["component_model_card"], 30.0);
        assert_eq!(report.section_scores["component_basic"], 20.0);
        assert_eq!(report.total_score, 80.0);
    }

    #[test]
    fn test_unbudgeted_category_scores_zero() {
        let report = scorer(json!({
            "fields": {
                "x": { "tier": "supplementary", "weight": 1, "category": "custom", "jsonpath": "$.x" }
            }
        }))
        .score(&json!({ "x": 1 }), None);
        assert_eq!(report.section_scores["custom"], 0.0);
        assert!(!report.max_scores.contains_key("custom"));
        assert_eq!(report.section_scores["metadata"], 0.0);
    }

    #[test]
    fn test_provenance_decides_when_path_misses() {
        let scorer = scorer(json!({
            "fields": {
                "domain": { "tier": "supplementary", "weight": 1, "category": "metadata", "jsonpath": "$.metadata.domain" }
            }
        }));
        // Structurally present at top level, but the path misses.
        let doc = json!({ "domain": "nlp" });
        assert!(scorer.is_present(&doc, "domain", None));

        let mut provenance = ProvenanceMap::new();
        let mut low = ExtractionResult::resolved(json!("nlp"), Strategy::TextPattern, Vec::new());
        low.confidence = aibom_core::Confidence::Low;
        provenance.insert("domain".into(), low);
        assert!(!scorer.is_present(&doc, "domain", Some(&provenance)));

        provenance.insert(
            "domain".into(),
            ExtractionResult::resolved(json!("nlp"), Strategy::Api, Vec::new()),
        );
        assert!(scorer.is_present(&json!({}), "domain", Some(&provenance)));

        let doc = json!({ "metadata": { "domain": "nlp" } });
        provenance.insert("domain".into(), ExtractionResult::unresolved(Vec::new()));
        assert!(scorer.is_present(&doc, "domain", Some(&provenance)));
    }

    #[test]
    fn test_recommendations_by_priority() {
        let scorer = scorer(json!({
            "fields": {
                "name": {
                    "tier": "critical", "weight": 4, "category": "component_basic",
                    "validation_message": { "missing": "No name", "recommendation": "Name it" }
                },
                "purl": { "tier": "critical", "weight": 4, "category": "component_basic" },
                "type": { "tier": "important", "weight": 3, "category": "component_basic" },
                "s1": { "tier": "supplementary", "category": "metadata" },
                "s2": { "tier": "supplementary", "category": "metadata" },
                "s3": { "tier": "supplementary", "category": "metadata" },
                "s4": { "tier": "supplementary", "category": "metadata" },
                "s5": { "tier": "supplementary", "category": "metadata" },
                "s6": { "tier": "supplementary", "category": "metadata" }
            }
        }));
        let report = scorer.score(&json!({}), None);
        let recs = &report.recommendations;
        assert_eq!(recs.len(), 8);
        assert_eq!(recs[0].field, "name");
        assert_eq!(recs[0].message, "No name");
        assert_eq!(recs[0].recommendation, "Name it");
        assert_eq!(recs[0].impact, 12.0);
        assert_eq!(recs[1].message, "Missing critical field: purl");
        assert_eq!(recs[2].priority, Priority::Medium);
        assert_eq!(recs[2].message, "Missing field: type");
        assert_eq!(recs[3].priority, Priority::Low);
        assert_eq!(recs[7].field, "s5");
        assert_eq!(report.missing_fields.supplementary.len(), 6);
    }

    #[test]
    fn test_unknown_tier_counts_but_is_not_listed_missing() {
        let mut fields = serde_json::Map::new();
        for i in 0..6 {
            fields.insert(
                format!("odd{i}"),
                json!({ "tier": "optional", "weight": 1, "category": "metadata", "jsonpath": format!("$.odd{i}") }),
            );
        }
        fields.insert(
            "notes".into(),
            json!({ "tier": "supplementary", "weight": 1, "category": "metadata", "jsonpath": "$.notes" }),
        );
        let report = scorer(json!({ "fields": fields })).score(&json!({ "odd0": "x" }), None);

        // metadata: 1 of 7 present.
        assert_eq!(report.section_scores["metadata"], 2.9);
        assert_eq!(report.missing_fields.supplementary, vec!["notes"]);
        assert_eq!(report.missing_fields.total(), 1);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].field, "notes");
        assert_eq!(report.field_checklist["odd1"], "✘ ★");
    }

    #[test]
    fn test_checklist_glyphs() {
        let report = scorer(penalty_catalog(1, 1)).score(&json!({ "crit0": "x" }), None);
        assert_eq!(report.field_checklist["crit0"], "✔ ★★★");
        assert_eq!(report.field_checklist["imp0"], "✘ ★★");
        assert_eq!(report.field_checklist["sup0"], "✘ ★");
    }

    #[test]
    fn test_without_registry() {
        let report = CompletenessScorer::without_registry().score(&json!({ "bomFormat": "CycloneDX" }), None);
        assert_eq!(report.total_score, 0.0);
        assert_eq!(report.completeness_profile.name, "incomplete");
        assert!(report.field_checklist.is_empty());
        assert_eq!(report.max_scores.len(), 5);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_validation_section() {
        let scorer = scorer(penalty_catalog(1, 0)).with_validator(RequiredKeysValidator);
        let report = scorer.score(&json!({ "bomFormat": "SPDX", "specVersion": "2.3" }), None);
        let validation = report.validation.unwrap();
        assert!(!validation.valid);
        assert_eq!(validation.error_count, 1);

        let plain = CompletenessScorer::without_registry().score(&json!({}), None);
        assert!(plain.validation.is_none());
    }
}
