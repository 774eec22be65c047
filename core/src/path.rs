//! Path expressions for locating fields inside an assembled document.
//!
//! The language is a small JSONPath subset:
//!
//! - dot-separated keys: `metadata.component.name`
//! - integer indexes: `components[0].modelCard`
//! - first-match predicates: `metadata.properties[?(@.name=='primaryPurpose')].value`
//! - an optional leading `$.` root marker
//!
//! Resolution never fails loudly. Anything unresolvable, including a
//! malformed path, yields `None`, and so does a value that resolves to
//! `null`, `""` or `[]`: absence and emptiness are both "missing".

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::value::is_meaningful;

/// Syntax errors reported by [`PathExpr::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Path string is empty or only a root marker with a trailing dot.
    #[error("path is empty")]
    Empty,
    /// A segment between two dots has no key and no selector.
    #[error("empty segment at offset {0}")]
    EmptySegment(usize),
    /// `[` without a matching `]`.
    #[error("unterminated bracket at offset {0}")]
    UnterminatedBracket(usize),
    /// Bracket content is neither an index nor a predicate.
    #[error("invalid index '{0}'")]
    InvalidIndex(String),
    /// Predicate does not follow the `?(@.key=='value')` form.
    #[error("invalid predicate '{0}'")]
    InvalidPredicate(String),
    /// Stray character after a bracket or a closing bracket without opener.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
}

/// One bracketed selector applied after a segment's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Positional index into a list.
    Index(usize),
    /// First list element whose `key` stringifies to `value`.
    Filter { key: String, value: String },
}

/// One dot-separated path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Object key; `None` for a bare selector such as `[0]`.
    pub key: Option<String>,
    pub selectors: Vec<Selector>,
}

/// A parsed path expression.
///
/// # Examples
///
/// ```
/// use aibom_core::{PathError, PathExpr};
/// use serde_json::json;
///
/// let expr = PathExpr::parse("$.components[0].name").unwrap();
/// let doc = json!({ "components": [{ "name": "bert" }] });
/// assert_eq!(expr.lookup(&doc), Some(&json!("bert")));
///
/// assert_eq!(PathExpr::parse("components[0"), Err(PathError::UnterminatedBracket(10)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    segments: Vec<Segment>,
}

impl PathExpr {
    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] describing the first syntax problem found.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim();
        if trimmed == "$" {
            return Ok(Self {
                segments: Vec::new(),
            });
        }
        let body = trimmed.strip_prefix("$.").unwrap_or(trimmed);
        if body.is_empty() {
            return Err(PathError::Empty);
        }

        let chars: Vec<char> = body.chars().collect();
        let mut segments = Vec::new();
        let mut pos = 0;

        loop {
            let start = pos;
            while pos < chars.len() && chars[pos] != '.' && chars[pos] != '[' {
                if chars[pos] == ']' {
                    return Err(PathError::UnexpectedChar {
                        ch: ']',
                        offset: pos,
                    });
                }
                pos += 1;
            }
            let key: String = chars[start..pos].iter().collect();

            let mut selectors = Vec::new();
            while pos < chars.len() && chars[pos] == '[' {
                let close = find_closing_bracket(&chars, pos)?;
                let inner: String = chars[pos + 1..close].iter().collect();
                selectors.push(parse_selector(&inner)?);
                pos = close + 1;
            }

            if key.is_empty() && selectors.is_empty() {
                return Err(PathError::EmptySegment(start));
            }
            segments.push(Segment {
                key: (!key.is_empty()).then_some(key),
                selectors,
            });

            if pos == chars.len() {
                break;
            }
            match chars[pos] {
                '.' => {
                    pos += 1;
                    if pos == chars.len() {
                        return Err(PathError::EmptySegment(pos));
                    }
                }
                ch => return Err(PathError::UnexpectedChar { ch, offset: pos }),
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Resolves the expression against `document`.
    ///
    /// Returns `None` when any step fails or when the final value is
    /// `null`, `""` or `[]`.
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut current = document;
        for segment in &self.segments {
            if let Some(key) = &segment.key {
                current = current.as_object()?.get(key)?;
            }
            for selector in &segment.selectors {
                current = apply_selector(current, selector)?;
            }
        }
        is_meaningful(current).then_some(current)
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            if let Some(key) = &segment.key {
                write!(f, ".{key}")?;
            }
            for selector in &segment.selectors {
                match selector {
                    Selector::Index(index) => write!(f, "[{index}]")?,
                    Selector::Filter { key, value } => write!(f, "[?(@.{key}=='{value}')]")?,
                }
            }
        }
        Ok(())
    }
}

/// Resolves `path` against `document`, returning the value when present.
///
/// Malformed paths resolve to `None`; this function never panics.
///
/// # Examples
///
/// ```
/// use aibom_core::resolve;
/// use serde_json::json;
///
/// let doc = json!({
///     "externalReferences": [
///         { "type": "website", "url": "https://a" },
///         { "type": "distribution", "url": "https://b" },
///         { "type": "distribution", "url": "https://c" }
///     ]
/// });
///
/// // First match only.
/// assert_eq!(
///     resolve(&doc, "externalReferences[?(@.type=='distribution')].url"),
///     Some(&json!("https://b"))
/// );
/// assert_eq!(resolve(&doc, "externalReferences[9]"), None);
/// assert_eq!(resolve(&doc, "externalReferences[?(@.type=="), None);
/// ```
pub fn resolve<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    PathExpr::parse(path).ok()?.lookup(document)
}

fn apply_selector<'a>(current: &'a Value, selector: &Selector) -> Option<&'a Value> {
    let items = current.as_array()?;
    match selector {
        Selector::Index(index) => items.get(*index),
        Selector::Filter { key, value } => items.iter().find(|item| {
            item.as_object()
                .and_then(|object| object.get(key))
                .and_then(predicate_text)
                .is_some_and(|text| text == *value)
        }),
    }
}

/// Text a predicate compares against. `null`, arrays and objects never
/// match.
fn predicate_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn find_closing_bracket(chars: &[char], open: usize) -> Result<usize, PathError> {
    let mut quote: Option<char> = None;
    for (offset, &ch) in chars.iter().enumerate().skip(open + 1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, ']') => return Ok(offset),
            (None, _) => {}
        }
    }
    Err(PathError::UnterminatedBracket(open))
}

fn parse_selector(inner: &str) -> Result<Selector, PathError> {
    let trimmed = inner.trim();
    if let Some(predicate) = trimmed
        .strip_prefix("?(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_predicate(predicate.trim())
            .ok_or_else(|| PathError::InvalidPredicate(trimmed.to_string()));
    }
    trimmed
        .parse::<usize>()
        .map(Selector::Index)
        .map_err(|_| PathError::InvalidIndex(trimmed.to_string()))
}

fn parse_predicate(predicate: &str) -> Option<Selector> {
    let rest = predicate.strip_prefix("@.")?;
    let (key, literal) = rest.split_once("==")?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|ch| ch.is_alphanumeric() || ch == '_') {
        return None;
    }
    let literal = literal.trim();
    let value = literal
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
        .or_else(|| literal.strip_prefix('"').and_then(|l| l.strip_suffix('"')))?;
    if value.is_empty() {
        return None;
    }
    Some(Selector::Filter {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_document() -> Value {
        json!({
            "bomFormat": "CycloneDX",
            "serialNumber": "",
            "metadata": {
                "properties": [
                    { "name": "primaryPurpose", "value": "text-generation" },
                    { "name": "suppliedBy", "value": "acme" },
                    { "name": "primaryPurpose", "value": "ignored-second" },
                    { "name": "empty", "value": [] }
                ],
                "component": { "name": "model" }
            },
            "components": [
                {
                    "name": "bert-base",
                    "version": 3,
                    "modelCard": {
                        "modelParameters": { "datasets": [] },
                        "considerations": { "technicalLimitations": ["small context"] }
                    }
                }
            ]
        })
    }

    #[test]
    fn test_resolves_dotted_path_with_root_marker() {
        let doc = sample_document();
        assert_eq!(resolve(&doc, "$.bomFormat"), Some(&json!("CycloneDX")));
        assert_eq!(
            resolve(&doc, "metadata.component.name"),
            Some(&json!("model"))
        );
    }

    #[test]
    fn test_resolves_index_segments() {
        let doc = sample_document();
        assert_eq!(
            resolve(&doc, "$.components[0].name"),
            Some(&json!("bert-base"))
        );
        assert_eq!(
            resolve(
                &doc,
                "$.components[0].modelCard.considerations.technicalLimitations[0]"
            ),
            Some(&json!("small context"))
        );
    }

    #[test]
    fn test_index_out_of_range_and_non_list_fail() {
        let doc = sample_document();
        assert_eq!(resolve(&doc, "$.components[1].name"), None);
        assert_eq!(resolve(&doc, "$.bomFormat[0]"), None);
        assert_eq!(resolve(&doc, "$.missing[0]"), None);
    }

    #[test]
    fn test_predicate_selects_first_match_and_suffix() {
        let doc = sample_document();
        assert_eq!(
            resolve(
                &doc,
                "$.metadata.properties[?(@.name=='primaryPurpose')].value"
            ),
            Some(&json!("text-generation"))
        );
        assert_eq!(
            resolve(&doc, "$.metadata.properties[?(@.name=='suppliedBy')]"),
            Some(&json!({ "name": "suppliedBy", "value": "acme" }))
        );
    }

    #[test]
    fn test_predicate_without_match_fails() {
        let doc = sample_document();
        assert_eq!(
            resolve(&doc, "$.metadata.properties[?(@.name=='nope')].value"),
            None
        );
        assert_eq!(resolve(&doc, "$.bomFormat[?(@.name=='x')]"), None);
    }

    #[test]
    fn test_predicate_stringifies_numbers() {
        let doc = json!({ "items": [{ "id": 7, "v": "seven" }] });
        assert_eq!(resolve(&doc, "items[?(@.id=='7')].v"), Some(&json!("seven")));
    }

    #[test]
    fn test_empty_values_are_absent() {
        let doc = sample_document();
        assert_eq!(resolve(&doc, "$.serialNumber"), None);
        assert_eq!(
            resolve(&doc, "$.components[0].modelCard.modelParameters.datasets"),
            None
        );
        assert_eq!(
            resolve(&doc, "$.metadata.properties[?(@.name=='empty')].value"),
            None
        );
        let doc = json!({ "a": null });
        assert_eq!(resolve(&doc, "a"), None);
    }

    #[test]
    fn test_number_zero_is_present() {
        let doc = json!({ "downloads": 0 });
        assert_eq!(resolve(&doc, "downloads"), Some(&json!(0)));
    }

    #[test]
    fn test_malformed_paths_never_panic() {
        let doc = sample_document();
        for path in [
            "",
            "$.",
            "a..b",
            "a.",
            "components[",
            "components[x]",
            "components[-1]",
            "components]0[",
            "components[0]name",
            "metadata.properties[?(@.name==primaryPurpose)]",
            "metadata.properties[?(name=='x')]",
            "metadata.properties[?(@.=='x')]",
            "[[[",
            "$$$",
        ] {
            assert_eq!(resolve(&doc, path), None, "path {path:?}");
        }
    }

    #[test]
    fn test_parse_errors_are_specific() {
        assert_eq!(PathExpr::parse(""), Err(PathError::Empty));
        assert_eq!(PathExpr::parse("$."), Err(PathError::Empty));
        assert_eq!(PathExpr::parse("a..b"), Err(PathError::EmptySegment(2)));
        assert_eq!(
            PathExpr::parse("a[x]"),
            Err(PathError::InvalidIndex("x".to_string()))
        );
        assert!(matches!(
            PathExpr::parse("a[?(@.k==v)]"),
            Err(PathError::InvalidPredicate(_))
        ));
        assert_eq!(
            PathExpr::parse("a[0]b"),
            Err(PathError::UnexpectedChar { ch: 'b', offset: 4 })
        );
    }

    #[test]
    fn test_predicate_value_may_contain_dots_and_brackets() {
        let doc = json!({ "p": [{ "name": "spdx:a.b[1]", "value": "ok" }] });
        assert_eq!(
            resolve(&doc, "p[?(@.name=='spdx:a.b[1]')].value"),
            Some(&json!("ok"))
        );
    }

    #[test]
    fn test_root_resolves_whole_document() {
        let doc = json!({ "a": 1 });
        assert_eq!(resolve(&doc, "$"), Some(&doc));
    }

    #[test]
    fn test_display_normalizes_root_marker() {
        let expr = PathExpr::parse("metadata.properties[?(@.name=='x')].value").unwrap();
        assert_eq!(
            expr.to_string(),
            "$.metadata.properties[?(@.name=='x')].value"
        );
        let expr = PathExpr::parse("components[0][1]").unwrap();
        assert_eq!(expr.to_string(), "$.components[0][1]");
    }
}
