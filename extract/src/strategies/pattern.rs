//! Free-text pattern matching over the README.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

use aibom_core::{Strategy, is_noise_token};
use aibom_registry::{FieldDefinition, MatchPolicy};

use super::FieldStrategy;
use crate::context::ExtractionContext;

pub const LICENSE_CATEGORY: &str = "license";
pub const MODEL_TYPE_CATEGORY: &str = "model_type";

/// Pattern categories in evaluation order.
pub const CATEGORIES: &[&str] = &[
    LICENSE_CATEGORY,
    "datasets",
    "metrics",
    MODEL_TYPE_CATEGORY,
    "energy",
    "limitations",
    "safety",
];

/// Field name to pattern category.
static PATTERN_FIELDS: &[(&str, &str)] = &[
    ("license", LICENSE_CATEGORY),
    ("licenses", LICENSE_CATEGORY),
    ("datasets", "datasets"),
    ("energyConsumption", "energy"),
    ("limitation", "limitations"),
    ("safetyRiskAssessment", "safety"),
    ("model_type", MODEL_TYPE_CATEGORY),
];

static PATTERNS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    let compile = |patterns: &[&str]| -> Vec<Regex> {
        patterns
            .iter()
            .map(|pattern| Regex::new(pattern).expect("static regex must compile"))
            .collect()
    };
    vec![
        (
            LICENSE_CATEGORY,
            compile(&[
                r"(?is)license[:\s]+([a-zA-Z0-9\-.\s]+)",
                r"(?is)licensed under[:\s]+([a-zA-Z0-9\-.\s]+)",
                // [License Name](link)
                r"(?is)governed by[:\s]+(?:the\s+)?\[([^\]]+)\]",
                r"(?is)governed by[:\s]+(?:the\s+)?([a-zA-Z0-9\-.\s]+)",
                r"(?is)governed by the[:\s]+\[([^\]]+)\]",
            ]),
        ),
        (
            "datasets",
            compile(&[
                r"(?i)trained on[:\s]+([a-zA-Z0-9\-_/]+)",
                r"(?i)dataset[:\s]+([a-zA-Z0-9\-_/]+)",
                r"(?i)using[:\s]+([a-zA-Z0-9\-_/]+)\s+dataset",
            ]),
        ),
        (
            "metrics",
            compile(&[
                r"(?i)([a-zA-Z]+)[:\s]+([0-9.]+)",
                r"(?i)achieves[:\s]+([0-9.]+)[:\s]+([a-zA-Z]+)",
            ]),
        ),
        (
            MODEL_TYPE_CATEGORY,
            compile(&[
                r"(?i)model type[:\s]+([a-zA-Z0-9\-]+)",
                r"(?i)architecture[:\s]+([a-zA-Z0-9\-]+)",
            ]),
        ),
        (
            "energy",
            compile(&[
                r"(?i)energy[:\s]+([0-9.]+)\s*([a-zA-Z]+)",
                r"(?i)power[:\s]+([0-9.]+)\s*([a-zA-Z]+)",
                r"(?i)consumption[:\s]+([0-9.]+)\s*([a-zA-Z]+)",
            ]),
        ),
        (
            "limitations",
            compile(&[
                r"(?i)limitations?[:\s]+([^.]+)",
                r"(?i)known issues?[:\s]+([^.]+)",
                r"(?i)constraints?[:\s]+([^.]+)",
            ]),
        ),
        (
            "safety",
            compile(&[
                r"(?i)safety[:\s]+([^.]+)",
                r"(?i)risks?[:\s]+([^.]+)",
                r"(?i)bias[:\s]+([^.]+)",
            ]),
        ),
    ]
});

/// Compiled patterns of `category`, in order.
pub fn patterns(category: &str) -> Option<&'static [Regex]> {
    PATTERNS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, patterns)| patterns.as_slice())
}

/// Pattern category for `field`: catalog hint first, then the built-in
/// table.
pub fn pattern_category<'a>(field: &str, definition: &'a FieldDefinition) -> Option<&'a str> {
    if let Some(category) = definition
        .extraction
        .as_ref()
        .and_then(|hints| hints.pattern_category.as_deref())
    {
        return Some(category);
    }
    PATTERN_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, category)| *category)
}

/// Conflict policy for a category when the catalog does not declare one.
pub fn default_policy(category: &str) -> MatchPolicy {
    match category {
        LICENSE_CATEGORY => MatchPolicy::Longest,
        MODEL_TYPE_CATEGORY => MatchPolicy::First,
        _ => MatchPolicy::Collect,
    }
}

/// Runs each pattern once against `text` and returns the surviving
/// captures.
///
/// The first capture group of each match is whitespace-collapsed; noise
/// tokens are dropped and duplicates removed, keeping first-seen order.
///
/// # Examples
///
/// ```
/// use aibom_extract::strategies::pattern::{find_matches, patterns};
///
/// let text = "Licensed under Apache, see below.\n\nLicense: Apache License 2.0, see LICENSE.";
/// let found = find_matches(text, patterns("license").unwrap());
/// assert_eq!(found, vec!["Apache License 2.0", "Apache"]);
/// ```
pub fn find_matches(text: &str, patterns: &[Regex]) -> Vec<String> {
    let mut matches: Vec<String> = Vec::new();
    for pattern in patterns {
        let Some(capture) = pattern.captures(text).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let collapsed = capture.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() || is_noise_token(&collapsed) || matches.contains(&collapsed) {
            continue;
        }
        matches.push(collapsed);
    }
    matches
}

/// Collapses surviving matches into one value under `policy`.
///
/// # Examples
///
/// ```
/// use aibom_extract::strategies::pattern::resolve_matches;
/// use aibom_registry::MatchPolicy;
/// use serde_json::json;
///
/// let found = vec!["Apache".to_string(), "Apache License 2.0".to_string()];
/// assert_eq!(resolve_matches(&found, MatchPolicy::Longest), Some(json!("Apache License 2.0")));
/// assert_eq!(resolve_matches(&found, MatchPolicy::First), Some(json!("Apache")));
/// assert_eq!(resolve_matches(&found, MatchPolicy::Collect), Some(json!(found)));
/// ```
pub fn resolve_matches(matches: &[String], policy: MatchPolicy) -> Option<Value> {
    let first = matches.first()?;
    let value = match policy {
        MatchPolicy::Longest => {
            let longest = matches.iter().fold(first, |best, candidate| {
                if candidate.chars().count() > best.chars().count() {
                    candidate
                } else {
                    best
                }
            });
            json!(longest)
        }
        MatchPolicy::First => json!(first),
        MatchPolicy::Collect if matches.len() == 1 => json!(first),
        MatchPolicy::Collect => json!(matches),
    };
    Some(value)
}

/// Strategy 4: README free-text patterns.
pub struct PatternStrategy;

impl FieldStrategy for PatternStrategy {
    fn kind(&self) -> Strategy {
        Strategy::TextPattern
    }

    fn applies(&self, field: &str, definition: &FieldDefinition, context: &ExtractionContext) -> bool {
        context.readme().is_some() && pattern_category(field, definition).is_some()
    }

    fn extract(
        &self,
        field: &str,
        definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value> {
        let text = context.readme()?;
        let category = pattern_category(field, definition)?;
        let matches = find_matches(text, patterns(category)?);
        let policy = definition
            .extraction
            .as_ref()
            .and_then(|hints| hints.match_policy)
            .unwrap_or_else(|| default_policy(category));
        resolve_matches(&matches, policy)
    }
}

#[cfg(test)]
mod tests {
    use aibom_core::Tier;
    use aibom_registry::ExtractionHints;

    use super::*;

    fn context(readme: &str) -> ExtractionContext {
        ExtractionContext::builder("acme/widget").readme(readme).build()
    }

    fn definition(name: &str) -> FieldDefinition {
        FieldDefinition::new(name, Tier::Critical, "component_basic")
    }

    #[test]
    fn test_license_prefers_longest_match() {
        let ctx = context(
            "# Widget\n\nLicensed under Apache, see below.\n\nLicense: Apache License 2.0, see LICENSE.\n",
        );
        assert_eq!(
            PatternStrategy.extract("license", &definition("license"), &ctx),
            Some(json!("Apache License 2.0"))
        );
    }

    #[test]
    fn test_noise_tokens_are_dropped() {
        let ctx = context("This model is governed by the [Other] agreement.\n");
        assert_eq!(PatternStrategy.extract("license", &definition("license"), &ctx), None);
    }

    #[test]
    fn test_markdown_link_license_name() {
        let ctx = context("Use is governed by the [Llama 3 Community License](https://x/LICENSE).\n");
        assert_eq!(
            PatternStrategy.extract("licenses", &definition("licenses"), &ctx),
            Some(json!("Llama 3 Community License"))
        );
    }

    #[test]
    fn test_collect_returns_list_for_several_matches() {
        let ctx = context("Trained on: openwebtext and more.\nUsing c4 dataset.\n");
        assert_eq!(
            PatternStrategy.extract("datasets", &definition("datasets"), &ctx),
            Some(json!(["openwebtext", "c4"]))
        );
    }

    #[test]
    fn test_collect_returns_scalar_for_single_match() {
        let ctx = context("Known limitations: struggles with arithmetic. Other text\n");
        assert_eq!(
            PatternStrategy.extract("limitation", &definition("limitation"), &ctx),
            Some(json!("struggles with arithmetic"))
        );
    }

    #[test]
    fn test_model_type_takes_first() {
        let ctx = context("Model type: decoder-only\nArchitecture: llama\n");
        assert_eq!(
            PatternStrategy.extract("model_type", &definition("model_type"), &ctx),
            Some(json!("decoder-only"))
        );
    }

    #[test]
    fn test_declared_policy_overrides_default() {
        let ctx = context("Licensed under Apache, see below.\n\nLicense: Apache License 2.0, ok\n");
        let def = definition("license").with_extraction(ExtractionHints {
            match_policy: Some(MatchPolicy::Collect),
            ..Default::default()
        });
        assert_eq!(
            PatternStrategy.extract("license", &def, &ctx),
            Some(json!(["Apache License 2.0", "Apache"]))
        );
    }

    #[test]
    fn test_unmapped_field_does_not_apply() {
        let ctx = context("License: MIT\n");
        assert!(!PatternStrategy.applies("description", &definition("description"), &ctx));
    }
}
