//! Error types for secondary retrieval of repository files.
//!
//! Strategies never propagate these; a failed fetch is logged and treated as
//! "no candidate".

use thiserror::Error;

/// Errors that can occur while fetching a repository file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// File exists but could not be read.
    #[error("failed to read repository file {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON where JSON was expected.
    #[error("invalid JSON in repository file {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// File name escapes the repository root or is empty.
    #[error("rejected repository file name: {0:?}")]
    InvalidName(String),
}

/// Convenience alias for results with [`FetchError`].
pub type Result<T> = std::result::Result<T, FetchError>;
