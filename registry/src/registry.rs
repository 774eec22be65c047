//! Field registry loading with memoized derived views.
//!
//! A [`FieldRegistry`] is built once at process start and shared by
//! reference (typically `Arc<FieldRegistry>`) with the extraction engine and
//! the completeness scorer. It is immutable after load; every derived view
//! is computed on first use and cached.
//!
//! ```no_run
//! use std::sync::Arc;
//! use aibom_registry::FieldRegistry;
//!
//! let registry = Arc::new(FieldRegistry::load("field_registry.json").unwrap());
//! for (name, def) in registry.field_definitions() {
//!     println!("{name}: {} / {}", def.tier, def.category);
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde_json::Value;
use tracing::{info, warn};

use aibom_core::Tier;

use crate::catalog::{FieldDefinition, ValidationMessage};
use crate::config::{CompletenessProfile, ScoringConfig, default_profiles};
use crate::error::{RegistryError, Result};

/// The loaded field catalog.
#[derive(Debug)]
pub struct FieldRegistry {
    source: Option<PathBuf>,
    raw: Value,
    fields: BTreeMap<String, FieldDefinition>,
    scoring: OnceLock<ScoringConfig>,
    profiles: OnceLock<BTreeMap<String, CompletenessProfile>>,
    messages: OnceLock<BTreeMap<String, ValidationMessage>>,
}

impl FieldRegistry {
    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be read, and the
    /// errors of [`from_value`](Self::from_value) for malformed content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut registry = Self::from_json_str(&raw)?;
        registry.source = Some(path.to_path_buf());
        info!(
            fields = registry.fields.len(),
            path = %path.display(),
            "field registry loaded"
        );
        Ok(registry)
    }

    /// Parses a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Json`] for invalid JSON, otherwise see
    /// [`from_value`](Self::from_value).
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Builds a registry from an already-parsed catalog document.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::MissingSection`] if `fields` is absent or not an
    ///   object.
    /// - [`RegistryError::EmptyFields`] if `fields` has no entries.
    /// - [`RegistryError::InvalidField`] if a definition has the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use aibom_registry::{FieldRegistry, RegistryError};
    /// use serde_json::json;
    ///
    /// let registry = FieldRegistry::from_value(json!({
    ///     "fields": {
    ///         "bomFormat": { "tier": "critical", "weight": 4,
    ///                        "category": "required_fields", "jsonpath": "$.bomFormat" }
    ///     }
    /// })).unwrap();
    /// assert_eq!(registry.field_path("bomFormat"), Some("$.bomFormat"));
    ///
    /// let err = FieldRegistry::from_value(json!({ "fields": {} })).unwrap_err();
    /// assert!(matches!(err, RegistryError::EmptyFields));
    /// ```
    pub fn from_value(raw: Value) -> Result<Self> {
        let entries = raw
            .get("fields")
            .and_then(Value::as_object)
            .ok_or(RegistryError::MissingSection("fields"))?;
        if entries.is_empty() {
            return Err(RegistryError::EmptyFields);
        }

        let mut fields = BTreeMap::new();
        for (name, entry) in entries {
            let mut definition: FieldDefinition = serde_json::from_value(entry.clone())
                .map_err(|source| RegistryError::InvalidField {
                    name: name.clone(),
                    source,
                })?;
            definition.name = name.clone();
            fields.insert(name.clone(), definition);
        }

        Ok(Self {
            source: None,
            raw,
            fields,
            scoring: OnceLock::new(),
            profiles: OnceLock::new(),
            messages: OnceLock::new(),
        })
    }

    /// Path the catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The catalog document as loaded.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// All field definitions keyed by name.
    pub fn field_definitions(&self) -> &BTreeMap<String, FieldDefinition> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Configured path expression for `name`, if any.
    pub fn field_path(&self, name: &str) -> Option<&str> {
        self.fields.get(name)?.path.as_deref()
    }

    pub fn fields_by_category(&self, category: &str) -> Vec<&str> {
        self.fields
            .values()
            .filter(|def| def.category == category)
            .map(|def| def.name.as_str())
            .collect()
    }

    pub fn fields_by_tier(&self, tier: Tier) -> Vec<&str> {
        self.fields
            .values()
            .filter(|def| def.tier == tier)
            .map(|def| def.name.as_str())
            .collect()
    }

    /// Generation settings from the optional `aibom_config` section.
    ///
    /// The engine itself reads nothing from it; callers assembling documents
    /// may.
    pub fn aibom_config(&self) -> Option<&serde_json::Map<String, Value>> {
        self.raw.get("aibom_config").and_then(Value::as_object)
    }

    /// Tier and category weights, falling back to defaults for missing or
    /// malformed tables.
    pub fn scoring_config(&self) -> &ScoringConfig {
        self.scoring.get_or_init(|| {
            let Some(section) = self.raw.get("scoring_config") else {
                return ScoringConfig::default();
            };
            serde_json::from_value(section.clone()).unwrap_or_else(|err| {
                warn!(error = %err, "malformed scoring_config, using defaults");
                ScoringConfig::default()
            })
        })
    }

    /// Completeness profiles keyed by name.
    ///
    /// Falls back to the built-in `basic`/`standard`/`advanced` profiles when
    /// the catalog defines none, so the scorer never runs without profiles.
    pub fn profiles(&self) -> &BTreeMap<String, CompletenessProfile> {
        self.profiles.get_or_init(|| {
            let declared = self
                .raw
                .get("scoring_config")
                .and_then(|section| section.get("scoring_profiles"))
                .and_then(Value::as_object);

            let mut profiles = BTreeMap::new();
            for (name, entry) in declared.into_iter().flatten() {
                match serde_json::from_value::<CompletenessProfile>(entry.clone()) {
                    Ok(mut profile) => {
                        profile.name = name.clone();
                        if profile.description.is_empty() {
                            profile.description = format!("{} completeness profile", title_case(name));
                        }
                        profiles.insert(name.clone(), profile);
                    }
                    Err(err) => warn!(profile = %name, error = %err, "skipping malformed profile"),
                }
            }

            if profiles.is_empty() {
                default_profiles()
            } else {
                profiles
            }
        })
    }

    /// Missing-field messages for fields that declare one, with generic
    /// wording filled in for omitted parts.
    pub fn validation_messages(&self) -> &BTreeMap<String, ValidationMessage> {
        self.messages.get_or_init(|| {
            self.fields
                .values()
                .filter_map(|def| {
                    let declared = def.validation_message.as_ref()?;
                    let missing = if declared.missing.is_empty() {
                        format!("Missing field: {}", def.name)
                    } else {
                        declared.missing.clone()
                    };
                    let recommendation = if declared.recommendation.is_empty() {
                        format!("Consider adding {} field", def.name)
                    } else {
                        declared.recommendation.clone()
                    };
                    Some((
                        def.name.clone(),
                        ValidationMessage {
                            missing,
                            recommendation,
                        },
                    ))
                })
                .collect()
        })
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
