//! Error types for field catalog loading.
//!
//! Every variant is a boot-time fatal condition: a registry either loads
//! completely or not at all.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a field catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Catalog file could not be read.
    #[error("failed to read field registry at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid JSON.
    #[error("invalid JSON in field registry: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level section is absent or has the wrong shape.
    #[error("registry missing required section: {0}")]
    MissingSection(&'static str),

    /// The `fields` section contains no definitions.
    #[error("registry 'fields' section is empty")]
    EmptyFields,

    /// One field definition could not be deserialized.
    #[error("invalid definition for field '{name}': {source}")]
    InvalidField {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
