//! License identifier normalization and license-file header detection.

/// Known license header phrases (lowercase) mapped to SPDX identifiers.
///
/// Ordered most specific first; [`detect_license_header`] returns the first
/// phrase found as a whole word sequence.
const LICENSE_HEADERS: &[(&str, &str)] = &[
    ("apache license, version 2.0", "Apache-2.0"),
    ("apache license version 2.0", "Apache-2.0"),
    ("apache license 2.0", "Apache-2.0"),
    ("apache 2.0", "Apache-2.0"),
    ("gnu general public license v3", "GPL-3.0-only"),
    ("gnu general public license v2", "GPL-2.0-only"),
    ("gplv3", "GPL-3.0-only"),
    ("gplv2", "GPL-2.0-only"),
    ("bsd 3-clause", "BSD-3-Clause"),
    ("bsd-3-clause", "BSD-3-Clause"),
    ("bsd 2-clause", "BSD-2-Clause"),
    ("bsd-2-clause", "BSD-2-Clause"),
    ("mit license", "MIT"),
    ("mit", "MIT"),
];

/// Canonical SPDX identifiers the engine recognizes.
const KNOWN_SPDX_IDS: &[&str] = &[
    "Apache-2.0",
    "MIT",
    "BSD-3-Clause",
    "BSD-2-Clause",
    "GPL-3.0-only",
    "GPL-2.0-only",
    "LGPL-3.0-only",
    "CC-BY-4.0",
    "CC-BY-SA-4.0",
    "CC-BY-NC-4.0",
    "CC-BY-ND-4.0",
    "CC-BY-NC-SA-4.0",
    "CC-BY-NC-ND-4.0",
    "CC0-1.0",
    "MPL-2.0",
    "Unlicense",
    "nvidia-open-model-license",
];

/// Common spellings mapped to SPDX identifiers.
const LICENSE_ALIASES: &[(&str, &str)] = &[
    ("apache license 2.0", "Apache-2.0"),
    ("apache 2.0", "Apache-2.0"),
    ("mit license", "MIT"),
    ("gpl-3.0", "GPL-3.0-only"),
    ("gpl-2.0", "GPL-2.0-only"),
    ("nvidia open model license agreement", "nvidia-open-model-license"),
];

/// Detects a license from the leading text of a license file.
///
/// Matching is case-insensitive, treats any whitespace run as one space and
/// requires word boundaries around the phrase, so `"permitted"` does not
/// count as `"mit"`.
///
/// # Examples
///
/// ```
/// use aibom_core::license::detect_license_header;
///
/// assert_eq!(detect_license_header("Apache License\nVersion 2.0, January 2004"), Some("Apache-2.0"));
/// assert_eq!(detect_license_header("  Apache License, Version 2.0  "), Some("Apache-2.0"));
/// assert_eq!(detect_license_header("MIT License\n\nCopyright (c) 2024"), Some("MIT"));
/// assert_eq!(detect_license_header("use is permitted"), None);
/// ```
pub fn detect_license_header(snippet: &str) -> Option<&'static str> {
    let lowered = snippet
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    LICENSE_HEADERS
        .iter()
        .find(|(phrase, _)| contains_phrase(&lowered, phrase))
        .map(|(_, spdx)| *spdx)
}

/// Normalizes a license string to a canonical SPDX identifier.
///
/// Returns `None` for empty input or free text that does not look like an
/// identifier. Unknown identifier-like strings (no spaces, shorter than 50
/// characters) are returned unchanged.
///
/// # Examples
///
/// ```
/// use aibom_core::license::normalize_license_id;
///
/// assert_eq!(normalize_license_id("apache-2.0").as_deref(), Some("Apache-2.0"));
/// assert_eq!(normalize_license_id("MIT License").as_deref(), Some("MIT"));
/// assert_eq!(normalize_license_id("llama2").as_deref(), Some("llama2"));
/// assert_eq!(normalize_license_id("some custom terms"), None);
/// ```
pub fn normalize_license_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if KNOWN_SPDX_IDS.contains(&trimmed) {
        return Some(trimmed.to_string());
    }

    let lowered = trimmed.to_lowercase();
    if let Some((_, spdx)) = LICENSE_ALIASES.iter().find(|(alias, _)| *alias == lowered) {
        return Some((*spdx).to_string());
    }
    if let Some(spdx) = KNOWN_SPDX_IDS
        .iter()
        .find(|id| id.to_lowercase() == lowered)
    {
        return Some((*spdx).to_string());
    }

    if !trimmed.contains(' ') && trimmed.len() < 50 {
        return Some(trimmed.to_string());
    }
    None
}

/// Returns `true` if `id` is one of the canonical identifiers (exact case).
pub fn is_known_spdx_id(id: &str) -> bool {
    KNOWN_SPDX_IDS.contains(&id)
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_and_aliased_ids() {
        assert_eq!(normalize_license_id("Apache-2.0").as_deref(), Some("Apache-2.0"));
        assert_eq!(normalize_license_id("apache-2.0").as_deref(), Some("Apache-2.0"));
        assert_eq!(normalize_license_id("mit").as_deref(), Some("MIT"));
        assert_eq!(normalize_license_id("MIT License").as_deref(), Some("MIT"));
        assert_eq!(normalize_license_id("cc-by-nc-4.0").as_deref(), Some("CC-BY-NC-4.0"));
        assert_eq!(normalize_license_id("   "), None);
    }

    #[test]
    fn test_header_detection_prefers_specific_phrases() {
        let text = "GNU GENERAL PUBLIC LICENSE v3\nThis program is free software; MIT-like terms";
        assert_eq!(detect_license_header(text), Some("GPL-3.0-only"));
        assert_eq!(
            detect_license_header("BSD 3-Clause License\nRedistribution..."),
            Some("BSD-3-Clause")
        );
    }

    #[test]
    fn test_header_detection_respects_word_boundaries() {
        assert_eq!(detect_license_header("submitted and permitted"), None);
        assert_eq!(detect_license_header("(MIT)"), Some("MIT"));
    }

    #[test]
    fn test_known_ids_are_case_sensitive() {
        assert!(is_known_spdx_id("MIT"));
        assert!(!is_known_spdx_id("mit"));
    }
}
