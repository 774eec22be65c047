//! Document validation attached to score reports.
//!
//! Full CycloneDX schema validation is a collaborator behind
//! [`SchemaValidator`]; the scorer adds its own AI-specific checks on top.
//! [`RequiredKeysValidator`] is a lightweight built-in implementation for
//! callers without a schema engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibom_core::license::{is_known_spdx_id, normalize_license_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, code: &str, message: impl Into<String>, path: &str) -> Self {
        Self {
            severity,
            code: Some(code.to_string()),
            message: message.into(),
            path: Some(path.to_string()),
        }
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` when no issue has error severity.
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub error_count: usize,
}

impl ValidationReport {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let error_count = issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count();
        Self {
            valid: error_count == 0,
            issues,
            error_count,
        }
    }
}

/// Schema-level document validation.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, document: &Value) -> Vec<ValidationIssue>;
}

/// Checks the required top-level CycloneDX keys and container types.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredKeysValidator;

impl SchemaValidator for RequiredKeysValidator {
    fn validate(&self, document: &Value) -> Vec<ValidationIssue> {
        let Some(root) = document.as_object() else {
            return vec![ValidationIssue::new(
                Severity::Error,
                "INVALID_DOCUMENT",
                "Document must be a JSON object",
                "$",
            )];
        };

        let mut issues = Vec::new();
        for key in ["bomFormat", "specVersion"] {
            match root.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => issues.push(ValidationIssue::new(
                    Severity::Error,
                    "INVALID_TYPE",
                    format!("'{key}' must be a string"),
                    &format!("$.{key}"),
                )),
                None => issues.push(ValidationIssue::new(
                    Severity::Error,
                    "MISSING_REQUIRED",
                    format!("Required property '{key}' is missing"),
                    &format!("$.{key}"),
                )),
            }
        }
        let containers: [(&str, fn(&Value) -> bool, &str); 3] = [
            ("metadata", Value::is_object, "an object"),
            ("components", Value::is_array, "an array"),
            ("externalReferences", Value::is_array, "an array"),
        ];
        for (key, check, expected) in containers {
            if let Some(value) = root.get(key)
                && !check(value)
            {
                issues.push(ValidationIssue::new(
                    Severity::Error,
                    "INVALID_TYPE",
                    format!("'{key}' must be {expected}"),
                    &format!("$.{key}"),
                ));
            }
        }
        issues
    }
}

/// AI-specific checks applied to every validated document.
///
/// `bomFormat` must be `CycloneDX`; license entries on the first component
/// should carry a recognized SPDX identifier.
pub fn ai_requirement_issues(document: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if let Some(format) = document.get("bomFormat")
        && format.as_str() != Some("CycloneDX")
    {
        issues.push(ValidationIssue::new(
            Severity::Error,
            "INVALID_BOM_FORMAT",
            "Must be CycloneDX",
            "$.bomFormat",
        ));
    }

    let licenses = document
        .pointer("/components/0/licenses")
        .and_then(Value::as_array)
        .into_iter()
        .flatten();
    for (index, entry) in licenses.enumerate() {
        let path = format!("$.components[0].licenses[{index}]");
        let license = entry.get("license");
        if let Some(id) = license.and_then(|l| l.get("id")).and_then(Value::as_str) {
            if !is_known_spdx_id(id) {
                let message = match normalize_license_id(id).filter(|n| is_known_spdx_id(n)) {
                    Some(canonical) => format!("License id '{id}' should be written as '{canonical}'"),
                    None => format!("License id '{id}' is not a recognized SPDX identifier"),
                };
                issues.push(ValidationIssue::new(Severity::Warning, "NON_SPDX_LICENSE", message, &path));
            }
        } else if let Some(name) = license.and_then(|l| l.get("name")).and_then(Value::as_str)
            && name.eq_ignore_ascii_case("NOASSERTION")
        {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                "LICENSE_NOASSERTION",
                "License could not be determined",
                &path,
            ));
        }
    }
    issues
}
