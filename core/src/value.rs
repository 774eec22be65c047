//! Value predicates shared by every extraction strategy.
//!
//! A candidate value is only accepted when it is *truthy* (not null, not
//! empty, not zero, not `false`) and *informative* (its normalized text is
//! not one of the non-informative sentinels platforms use as placeholders).

use serde_json::Value;

/// Normalized (lowercase) forms that never count as a genuine value.
const SENTINEL_VALUES: &[&str] = &[
    "other",
    "['other']",
    "other license",
    "other-license",
    "unknown",
    "[]",
];

/// Tokens dropped from free-text matches before conflict resolution.
const NOISE_TOKENS: &[&str] = &["the", "other", "other license", "other-license", "unknown"];

/// Returns `true` if `value` is present for path-resolution purposes:
/// not `null`, not `""` and not `[]`.
pub fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Returns `true` if `value` is a non-empty, non-zero, non-false candidate.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Returns `true` if `value` is truthy and its normalized text is not a
/// sentinel. Lists are judged by their first element.
///
/// # Examples
///
/// ```
/// use aibom_core::is_informative;
/// use serde_json::json;
///
/// assert!(is_informative(&json!("mit")));
/// assert!(is_informative(&json!(["squad"])));
/// assert!(!is_informative(&json!("UNKNOWN")));
/// assert!(!is_informative(&json!(["Other"])));
/// assert!(!is_informative(&json!("[]")));
/// assert!(!is_informative(&json!([])));
/// ```
pub fn is_informative(value: &Value) -> bool {
    if !is_truthy(value) {
        return false;
    }
    let probe = match value {
        Value::Array(items) => items.first().unwrap_or(value),
        _ => value,
    };
    let normalized = value_text(probe).trim().to_lowercase();
    !SENTINEL_VALUES.contains(&normalized.as_str())
}

/// Returns `true` if a free-text capture is a generic noise token.
pub fn is_noise_token(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    NOISE_TOKENS.contains(&lowered.as_str())
}

/// Plain text form of a value: strings unquoted, everything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
