//! Diagnostic integrity checks over a loaded catalog.
//!
//! Integrity problems never stop the engine; the report exists so operators
//! can see degraded configuration before it shows up as odd scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use aibom_core::{PathExpr, Tier};

use crate::registry::FieldRegistry;

/// Properties every field entry must declare explicitly.
const REQUIRED_PROPERTIES: &[&str] = &["tier", "weight", "category", "jsonpath"];

/// Result of [`FieldRegistry::validate_integrity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// `true` when no errors were found (warnings are allowed).
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub field_count: usize,
    pub category_distribution: BTreeMap<String, usize>,
    pub tier_distribution: BTreeMap<String, usize>,
    /// SHA-256 hex digest of the catalog document.
    pub fingerprint: String,
}

impl FieldRegistry {
    /// Checks field entries and global weight tables.
    ///
    /// Missing `tier`/`weight`/`category`/`jsonpath` properties and
    /// unparseable paths are errors. Unrecognized tier names and missing
    /// `tier_weights` or `category_weights` tables are warnings.
    ///
    /// # Examples
    ///
    /// ```
    /// use aibom_registry::FieldRegistry;
    /// use serde_json::json;
    ///
    /// let registry = FieldRegistry::from_value(json!({
    ///     "fields": { "name": { "tier": "critical", "category": "component_basic" } }
    /// })).unwrap();
    ///
    /// let report = registry.validate_integrity();
    /// assert!(!report.valid);
    /// assert_eq!(report.errors.len(), 1);
    /// assert_eq!(report.warnings.len(), 2);
    /// ```
    pub fn validate_integrity(&self) -> IntegrityReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut category_distribution = BTreeMap::new();
        let mut tier_distribution = BTreeMap::new();

        let entries = self.raw().get("fields").and_then(Value::as_object);
        for (name, entry) in entries.into_iter().flatten() {
            let missing: Vec<&str> = REQUIRED_PROPERTIES
                .iter()
                .copied()
                .filter(|prop| !has_property(entry, prop))
                .collect();
            if !missing.is_empty() {
                errors.push(format!(
                    "Field '{name}' missing properties: {}",
                    missing.join(", ")
                ));
            }

            let category = entry
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            let tier = entry
                .get("tier")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            *category_distribution
                .entry(category.to_string())
                .or_insert(0) += 1;
            *tier_distribution.entry(tier.to_string()).or_insert(0) += 1;
            if has_property(entry, "tier") && !Tier::ALL.iter().any(|known| known.as_str() == tier) {
                warnings.push(format!(
                    "Field '{name}' has unknown tier '{tier}' and is never reported as missing"
                ));
            }
        }

        for def in self.field_definitions().values() {
            if let Some(path) = &def.path
                && let Err(err) = PathExpr::parse(path)
            {
                errors.push(format!("Field '{}' has invalid path '{path}': {err}", def.name));
            }
        }

        let scoring = self.raw().get("scoring_config");
        for table in ["tier_weights", "category_weights"] {
            let present = scoring
                .and_then(|section| section.get(table))
                .is_some_and(|value| value.as_object().is_some_and(|map| !map.is_empty()));
            if !present {
                warnings.push(format!("Missing {table} in scoring_config"));
            }
        }

        IntegrityReport {
            valid: errors.is_empty(),
            errors,
            warnings,
            field_count: self.field_definitions().len(),
            category_distribution,
            tier_distribution,
            fingerprint: fingerprint(self.raw()),
        }
    }
}

fn has_property(entry: &Value, property: &str) -> bool {
    match property {
        "jsonpath" => entry.get("jsonpath").is_some() || entry.get("path").is_some(),
        other => entry.get(other).is_some(),
    }
}

fn fingerprint(raw: &Value) -> String {
    let bytes = serde_json::to_vec(raw).unwrap_or_default();
    format!("{:x}", Sha256::digest(&bytes))
}
