//! Per-run inputs of the extraction engine.
//!
//! An [`ExtractionContext`] is built once per run from the platform record,
//! the README (whose front-matter becomes the structured card), auxiliary
//! configuration records, and an optional [`RepositoryFiles`] handle. It is
//! never mutated by strategies.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use aibom_core::MetadataMap;

use crate::source::RepositoryFiles;

/// Configuration records the engine knows how to use.
pub const CONFIG_RECORDS: &[&str] = &["config.json", "tokenizer_config.json"];

/// Platform API record for one model.
///
/// Every attribute is independently optional; accessors never assume a
/// sibling attribute is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default, alias = "modelId", alias = "id")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub pipeline_tag: Option<String>,
    #[serde(default)]
    pub downloads: Option<u64>,
    /// Revision hash of the repository head.
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub card_data: Option<MetadataMap>,
}

/// Structured model card: front-matter data plus the full text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    pub data: MetadataMap,
    pub content: String,
}

impl ModelCard {
    /// Parses a README, reading YAML front-matter into [`data`](Self::data).
    ///
    /// Unparseable front-matter is logged and yields empty card data.
    ///
    /// # Examples
    ///
    /// ```
    /// use aibom_extract::ModelCard;
    ///
    /// let card = ModelCard::parse("---\nlicense: mit\ndatasets:\n  - squad\n---\n# Model\n");
    /// assert_eq!(card.data["license"], "mit");
    /// assert_eq!(card.data["datasets"][0], "squad");
    /// assert!(card.content.starts_with("---"));
    /// ```
    pub fn parse(readme: &str) -> Self {
        let data = match split_front_matter(readme) {
            Some((yaml, _)) => parse_card_data(yaml),
            None => MetadataMap::new(),
        };
        Self {
            data,
            content: readme.to_string(),
        }
    }

    pub fn from_data(data: MetadataMap) -> Self {
        Self {
            data,
            content: String::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Splits leading `---` delimited front-matter from `text`.
///
/// Returns `(front_matter, body)` or `None` when the text does not open
/// with a complete front-matter block.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let first_line_end = text.find('\n')?;
    if text[..first_line_end].trim_end() != "---" {
        return None;
    }
    let yaml_start = first_line_end + 1;

    let mut offset = yaml_start;
    for line in text[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body_start = offset + line.len();
            return Some((&text[yaml_start..offset], &text[body_start..]));
        }
        offset += line.len();
    }
    None
}

fn parse_card_data(yaml: &str) -> MetadataMap {
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        Ok(Value::Null) => MetadataMap::new(),
        Ok(other) => {
            warn!(kind = %value_kind(&other), "model card front-matter is not a mapping");
            MetadataMap::new()
        }
        Err(err) => {
            warn!(error = %err, "unparseable model card front-matter");
            MetadataMap::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalizes a model identifier or repository URL to `namespace/name`.
///
/// # Examples
///
/// ```
/// use aibom_extract::normalize_model_id;
///
/// assert_eq!(normalize_model_id("https://huggingface.co/google/bert-base/tree/main"), "google/bert-base");
/// assert_eq!(normalize_model_id(" gpt2 "), "gpt2");
/// ```
pub fn normalize_model_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
    else {
        return trimmed.to_string();
    };
    let path = rest.split_once('/').map(|(_, path)| path).unwrap_or("");
    let path = path.split(['?', '#']).next().unwrap_or("");
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    parts.iter().take(2).copied().collect::<Vec<_>>().join("/")
}

/// Immutable bundle of everything one extraction run may read.
#[derive(Clone)]
pub struct ExtractionContext {
    model_id: String,
    model_info: Option<ModelInfo>,
    card: Option<ModelCard>,
    configs: BTreeMap<String, Value>,
    readme: Option<String>,
    enable_enrichment: bool,
    files: Option<Arc<dyn RepositoryFiles>>,
}

impl ExtractionContext {
    /// Returns a builder for the model `model_id`.
    pub fn builder(model_id: impl AsRef<str>) -> ExtractionContextBuilder {
        ExtractionContextBuilder::new(model_id)
    }

    /// Normalized `namespace/name` identifier.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Namespace segment of the identifier, if it has one.
    pub fn namespace(&self) -> Option<&str> {
        self.model_id.split_once('/').map(|(namespace, _)| namespace)
    }

    /// Last segment of the identifier.
    pub fn short_name(&self) -> &str {
        self.model_id.rsplit('/').next().unwrap_or(&self.model_id)
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model_info.as_ref()
    }

    pub fn card(&self) -> Option<&ModelCard> {
        self.card.as_ref()
    }

    /// Configuration record by file name.
    pub fn config(&self, record: &str) -> Option<&Value> {
        self.configs.get(record)
    }

    pub fn configs(&self) -> &BTreeMap<String, Value> {
        &self.configs
    }

    pub fn readme(&self) -> Option<&str> {
        self.readme.as_deref()
    }

    pub fn enable_enrichment(&self) -> bool {
        self.enable_enrichment
    }

    pub fn files(&self) -> Option<&dyn RepositoryFiles> {
        self.files.as_deref()
    }
}

impl fmt::Debug for ExtractionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionContext")
            .field("model_id", &self.model_id)
            .field("model_info", &self.model_info)
            .field("card", &self.card.as_ref().map(|card| card.data.len()))
            .field("configs", &self.configs.keys().collect::<Vec<_>>())
            .field("readme_len", &self.readme.as_ref().map(String::len))
            .field("enable_enrichment", &self.enable_enrichment)
            .field("files", &self.files.is_some())
            .finish()
    }
}

/// Builder for [`ExtractionContext`].
///
/// # Examples
///
/// ```
/// use aibom_extract::{ExtractionContext, InMemoryFiles, ModelInfo};
/// use std::sync::Arc;
///
/// let files = InMemoryFiles::new().with_file("config.json", r#"{"model_type":"gpt2"}"#);
/// let context = ExtractionContext::builder("openai-community/gpt2")
///     .model_info(ModelInfo { author: Some("openai-community".into()), ..Default::default() })
///     .readme("---\nlicense: mit\n---\n# GPT-2\n")
///     .files(Arc::new(files))
///     .build();
///
/// assert_eq!(context.card().unwrap().data["license"], "mit");
/// assert_eq!(context.config("config.json").unwrap()["model_type"], "gpt2");
/// ```
pub struct ExtractionContextBuilder {
    model_id: String,
    model_info: Option<ModelInfo>,
    card: Option<ModelCard>,
    configs: BTreeMap<String, Value>,
    readme: Option<String>,
    enable_enrichment: bool,
    files: Option<Arc<dyn RepositoryFiles>>,
}

impl ExtractionContextBuilder {
    pub fn new(model_id: impl AsRef<str>) -> Self {
        Self {
            model_id: normalize_model_id(model_id.as_ref()),
            model_info: None,
            card: None,
            configs: BTreeMap::new(),
            readme: None,
            enable_enrichment: false,
            files: None,
        }
    }

    pub fn model_info(mut self, info: ModelInfo) -> Self {
        self.model_info = Some(info);
        self
    }

    /// Sets an explicit card, overriding the one parsed from the README.
    pub fn card(mut self, card: ModelCard) -> Self {
        self.card = Some(card);
        self
    }

    pub fn readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = Some(readme.into());
        self
    }

    pub fn config(mut self, record: impl Into<String>, value: Value) -> Self {
        self.configs.insert(record.into(), value);
        self
    }

    pub fn enable_enrichment(mut self, enabled: bool) -> Self {
        self.enable_enrichment = enabled;
        self
    }

    pub fn files(mut self, files: Arc<dyn RepositoryFiles>) -> Self {
        self.files = Some(files);
        self
    }

    /// Finalizes the context.
    ///
    /// Missing pieces are filled from the repository files when available:
    /// the README, then the known configuration records. Fetch failures are
    /// logged and leave the piece absent.
    pub fn build(mut self) -> ExtractionContext {
        if let Some(files) = &self.files {
            if self.readme.is_none() {
                self.readme = fetch_or_warn(files.as_ref(), "README.md", |f, n| f.fetch_text(n));
            }
            for record in CONFIG_RECORDS {
                if !self.configs.contains_key(*record)
                    && let Some(value) = fetch_or_warn(files.as_ref(), record, |f, n| f.fetch_json(n))
                {
                    self.configs.insert(record.to_string(), value);
                }
            }
        }

        let card = self.card.or_else(|| {
            self.readme
                .as_deref()
                .map(ModelCard::parse)
                .filter(|card| !card.data.is_empty())
                .or_else(|| {
                    self.model_info
                        .as_ref()
                        .and_then(|info| info.card_data.clone())
                        .map(ModelCard::from_data)
                })
        });

        ExtractionContext {
            model_id: self.model_id,
            model_info: self.model_info,
            card,
            configs: self.configs,
            readme: self.readme,
            enable_enrichment: self.enable_enrichment,
            files: self.files,
        }
    }
}

fn fetch_or_warn<T>(
    files: &dyn RepositoryFiles,
    name: &str,
    fetch: impl Fn(&dyn RepositoryFiles, &str) -> crate::error::Result<Option<T>>,
) -> Option<T> {
    match fetch(files, name) {
        Ok(found) => {
            if found.is_none() {
                debug!(file = name, "repository file not present");
            }
            found
        }
        Err(err) => {
            warn!(file = name, error = %err, "repository file fetch failed");
            None
        }
    }
}
