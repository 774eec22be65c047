//! Structural field search over an assembled CycloneDX document.
//!
//! Used when a field has no catalog path, or its path does not resolve and
//! no provenance entry decides the question. Checks key presence only, at
//! the locations a CycloneDX AIBOM commonly carries metadata.

use serde_json::{Map, Value};

/// Considerations-section aliases for fields that live under
/// `modelCard.considerations`.
const CONSIDERATION_ALIASES: &[(&str, &[&str])] = &[
    ("limitation", &["technicalLimitations", "limitations"]),
    ("safetyRiskAssessment", &["ethicalConsiderations", "safetyRiskAssessment"]),
    ("energyConsumption", &["environmentalConsiderations", "energyConsumption"]),
];

/// Returns `true` if `field` appears at any well-known document location.
///
/// Locations, in order: top level, `metadata`, `metadata.properties` (by
/// `name` or `spdx:name`), then on the first component its direct keys,
/// `properties`, `modelCard`, `modelCard.modelParameters` and
/// `modelCard.considerations`. `downloadLocation` is also satisfied by a
/// `distribution` external reference that has a URL.
///
/// # Examples
///
/// ```
/// use aibom_scoring::find_field;
/// use serde_json::json;
///
/// let doc = json!({
///     "metadata": { "properties": [{ "name": "spdx:domain", "value": "nlp" }] },
///     "components": [{
///         "name": "widget",
///         "modelCard": { "considerations": { "technicalLimitations": ["short context"] } }
///     }],
///     "externalReferences": [{ "type": "distribution", "url": "https://x/tree/main" }]
/// });
///
/// assert!(find_field(&doc, "domain"));
/// assert!(find_field(&doc, "name"));
/// assert!(find_field(&doc, "limitation"));
/// assert!(find_field(&doc, "downloadLocation"));
/// assert!(!find_field(&doc, "energyConsumption"));
/// ```
pub fn find_field(document: &Value, field: &str) -> bool {
    let Some(root) = document.as_object() else {
        return false;
    };
    if root.contains_key(field) {
        return true;
    }

    if let Some(metadata) = root.get("metadata").and_then(Value::as_object)
        && (metadata.contains_key(field) || has_named_property(metadata, field))
    {
        return true;
    }

    if let Some(component) = first_component(root)
        && component_has_field(component, field)
    {
        return true;
    }

    field == "downloadLocation" && has_distribution_reference(root)
}

fn first_component(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get("components")?.as_array()?.first()?.as_object()
}

fn component_has_field(component: &Map<String, Value>, field: &str) -> bool {
    if component.contains_key(field) || has_named_property(component, field) {
        return true;
    }
    let Some(card) = component.get("modelCard").and_then(Value::as_object) else {
        return false;
    };
    if card.contains_key(field) {
        return true;
    }
    if card
        .get("modelParameters")
        .and_then(Value::as_object)
        .is_some_and(|params| params.contains_key(field))
    {
        return true;
    }
    let Some(considerations) = card.get("considerations").and_then(Value::as_object) else {
        return false;
    };
    let aliased = CONSIDERATION_ALIASES
        .iter()
        .find(|(name, _)| *name == field)
        .is_some_and(|(_, sections)| {
            sections.iter().any(|section| {
                considerations
                    .get(*section)
                    .is_some_and(aibom_core::is_truthy)
            })
        });
    aliased || considerations.contains_key(field)
}

/// `properties: [{ "name": field | "spdx:field", ... }]`
fn has_named_property(object: &Map<String, Value>, field: &str) -> bool {
    let prefixed = format!("spdx:{field}");
    object
        .get("properties")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|property| property.get("name").and_then(Value::as_str))
        .any(|name| name == field || name == prefixed)
}

fn has_distribution_reference(root: &Map<String, Value>) -> bool {
    root.get("externalReferences")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .any(|reference| {
            reference.get("type").and_then(Value::as_str) == Some("distribution")
                && reference.get("url").is_some_and(aibom_core::is_truthy)
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_only_first_component_is_searched() {
        let doc = json!({ "components": [{ "name": "a" }, { "purl": "pkg:x" }] });
        assert!(find_field(&doc, "name"));
        assert!(!find_field(&doc, "purl"));
    }

    #[test]
    fn test_model_parameters_and_card_keys() {
        let doc = json!({
            "components": [{
                "modelCard": {
                    "modelParameters": { "datasets": [] },
                    "quantitativeAnalysis": {}
                }
            }]
        });
        assert!(find_field(&doc, "datasets"));
        assert!(find_field(&doc, "quantitativeAnalysis"));
    }

    #[test]
    fn test_empty_consideration_alias_is_absent() {
        let doc = json!({
            "components": [{
                "modelCard": { "considerations": { "environmentalConsiderations": [] } }
            }]
        });
        assert!(!find_field(&doc, "energyConsumption"));
    }

    #[test]
    fn test_distribution_reference_needs_url() {
        let without_url = json!({ "externalReferences": [{ "type": "distribution" }] });
        assert!(!find_field(&without_url, "downloadLocation"));
        let website = json!({ "externalReferences": [{ "type": "website", "url": "https://x" }] });
        assert!(!find_field(&website, "downloadLocation"));
    }

    #[test]
    fn test_non_object_document() {
        assert!(!find_field(&json!([1, 2]), "name"));
        assert!(!find_field(&json!(null), "name"));
    }
}
