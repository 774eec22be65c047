//! External references attached to every extraction run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use aibom_core::MetadataMap;

/// Base URL of the model hosting platform.
pub const HUB_BASE_URL: &str = "https://huggingface.co";

/// A typed link from the model to a related resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub url: String,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Website,
    Distribution,
    Vcs,
}

impl ExternalReference {
    fn new(kind: ReferenceKind, url: String, comment: impl Into<String>) -> Self {
        Self {
            kind,
            url,
            comment: comment.into(),
        }
    }
}

/// Builds the repository, file tree, commit and dataset references for a
/// model.
///
/// The commit reference needs a `commit` entry in `metadata`; dataset
/// references are built from string entries of a `datasets` list.
///
/// # Examples
///
/// ```
/// use aibom_core::MetadataMap;
/// use aibom_extract::references::{ReferenceKind, external_references};
/// use serde_json::json;
///
/// let mut metadata = MetadataMap::new();
/// metadata.insert("commit".into(), json!("abc123"));
///
/// let refs = external_references("acme/widget", &metadata);
/// assert_eq!(refs.len(), 3);
/// assert_eq!(refs[2].kind, ReferenceKind::Vcs);
/// assert_eq!(refs[2].url, "https://huggingface.co/acme/widget/commit/abc123");
/// ```
pub fn external_references(model_id: &str, metadata: &MetadataMap) -> Vec<ExternalReference> {
    let repo_url = format!("{HUB_BASE_URL}/{model_id}");
    let mut refs = vec![
        ExternalReference::new(ReferenceKind::Website, repo_url.clone(), "Model repository"),
        ExternalReference::new(
            ReferenceKind::Distribution,
            format!("{repo_url}/tree/main"),
            "Model files",
        ),
    ];

    if let Some(commit) = metadata.get("commit") {
        let commit = match commit {
            Value::String(sha) => sha.clone(),
            other => other.to_string(),
        };
        refs.push(ExternalReference::new(
            ReferenceKind::Vcs,
            format!("{repo_url}/commit/{commit}"),
            "Specific commit",
        ));
    }

    if let Some(Value::Array(datasets)) = metadata.get("datasets") {
        refs.extend(datasets.iter().filter_map(Value::as_str).map(|dataset| {
            ExternalReference::new(
                ReferenceKind::Distribution,
                format!("{HUB_BASE_URL}/datasets/{dataset}"),
                format!("Training dataset: {dataset}"),
            )
        }));
    }

    refs
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_base_references_only() {
        let refs = external_references("acme/widget", &MetadataMap::new());
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].url, "https://huggingface.co/acme/widget");
        assert_eq!(refs[1].url, "https://huggingface.co/acme/widget/tree/main");
        assert_eq!(refs[1].comment, "Model files");
    }

    #[test]
    fn test_dataset_references_skip_non_strings() {
        let mut metadata = MetadataMap::new();
        metadata.insert("datasets".into(), json!(["c4", 7, "squad"]));
        let refs = external_references("acme/widget", &metadata);
        let datasets: Vec<&str> = refs[2..].iter().map(|r| r.comment.as_str()).collect();
        assert_eq!(datasets, vec!["Training dataset: c4", "Training dataset: squad"]);
    }

    #[test]
    fn test_scalar_datasets_ignored() {
        let mut metadata = MetadataMap::new();
        metadata.insert("datasets".into(), json!("c4"));
        assert_eq!(external_references("acme/widget", &metadata).len(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let refs = external_references("acme/widget", &MetadataMap::new());
        assert_eq!(
            serde_json::to_value(&refs[0]).unwrap(),
            json!({
                "type": "website",
                "url": "https://huggingface.co/acme/widget",
                "comment": "Model repository"
            })
        );
    }
}
