//! Platform API record lookups.

use serde_json::{Value, json};

use aibom_core::{Strategy, is_informative};
use aibom_registry::FieldDefinition;

use super::FieldStrategy;
use crate::context::{ExtractionContext, ModelInfo};
use crate::references::HUB_BASE_URL;

type Accessor = fn(&ModelInfo, &ExtractionContext) -> Option<Value>;

/// Field name to accessor over the platform record.
static ACCESSORS: &[(&str, Accessor)] = &[
    ("author", author),
    ("name", name),
    ("tags", tags),
    ("pipeline_tag", pipeline_tag),
    ("downloads", downloads),
    ("commit", commit),
    ("suppliedBy", author),
    ("primaryPurpose", pipeline_tag),
    ("downloadLocation", download_location),
    ("license", card_license),
    ("licenses", card_license),
    ("datasets", card_datasets),
    ("paper", paper),
];

/// Looks up the accessor registered for `field`.
pub fn accessor(field: &str) -> Option<Accessor> {
    ACCESSORS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, accessor)| *accessor)
}

/// Strategy 1: direct platform API lookup.
pub struct ApiStrategy;

impl FieldStrategy for ApiStrategy {
    fn kind(&self) -> Strategy {
        Strategy::Api
    }

    fn applies(&self, field: &str, _definition: &FieldDefinition, context: &ExtractionContext) -> bool {
        context.model_info().is_some() && accessor(field).is_some()
    }

    fn extract(
        &self,
        field: &str,
        _definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value> {
        let info = context.model_info()?;
        let accessor = accessor(field)?;
        accessor(info, context).filter(is_informative)
    }
}

fn author(info: &ModelInfo, context: &ExtractionContext) -> Option<Value> {
    info.author
        .as_deref()
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .or_else(|| context.model_id().split('/').next())
        .map(|author| json!(author))
}

fn name(info: &ModelInfo, context: &ExtractionContext) -> Option<Value> {
    let id = info.model_id.as_deref().unwrap_or(context.model_id());
    id.rsplit('/').next().map(|name| json!(name))
}

fn tags(info: &ModelInfo, _context: &ExtractionContext) -> Option<Value> {
    info.tags.as_ref().map(|tags| json!(tags))
}

fn pipeline_tag(info: &ModelInfo, _context: &ExtractionContext) -> Option<Value> {
    info.pipeline_tag.as_ref().map(|tag| json!(tag))
}

fn downloads(info: &ModelInfo, _context: &ExtractionContext) -> Option<Value> {
    info.downloads.map(|count| json!(count))
}

fn commit(info: &ModelInfo, _context: &ExtractionContext) -> Option<Value> {
    info.sha.as_ref().map(|sha| json!(sha))
}

fn download_location(_info: &ModelInfo, context: &ExtractionContext) -> Option<Value> {
    Some(json!(format!("{HUB_BASE_URL}/{}/tree/main", context.model_id())))
}

fn card_license(info: &ModelInfo, _context: &ExtractionContext) -> Option<Value> {
    info.card_data.as_ref()?.get("license").cloned()
}

fn card_datasets(info: &ModelInfo, _context: &ExtractionContext) -> Option<Value> {
    info.card_data.as_ref()?.get("datasets").cloned()
}

/// Explicit `paper` card entry, else arXiv links derived from `arxiv:` tags.
fn paper(info: &ModelInfo, _context: &ExtractionContext) -> Option<Value> {
    if let Some(paper) = info.card_data.as_ref().and_then(|data| data.get("paper"))
        && is_informative(paper)
    {
        return Some(paper.clone());
    }
    let links: Vec<String> = info
        .tags
        .iter()
        .flatten()
        .filter_map(|tag| tag.strip_prefix("arxiv:"))
        .map(|id| format!("https://arxiv.org/abs/{id}"))
        .collect();
    (!links.is_empty()).then(|| json!(links))
}
