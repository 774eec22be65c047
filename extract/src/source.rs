//! Secondary retrieval of repository files.
//!
//! [`RepositoryFiles`] is the only I/O seam of the extraction engine. The
//! engine asks for files by name and treats every error as "no candidate";
//! callers own timeouts and retries.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::error::{FetchError, Result};

/// Read access to the files of one model repository.
pub trait RepositoryFiles: Send + Sync {
    /// Returns the text of `filename`, or `Ok(None)` when the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the file exists but cannot be read, or
    /// the name is not a plain relative path.
    fn fetch_text(&self, filename: &str) -> Result<Option<String>>;

    /// Fetches `filename` and parses it as JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`fetch_text`](Self::fetch_text) errors and returns
    /// [`FetchError::Json`] for unparseable content.
    fn fetch_json(&self, filename: &str) -> Result<Option<Value>> {
        let Some(text) = self.fetch_text(filename)? else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| FetchError::Json {
                name: filename.to_string(),
                source,
            })
    }
}

/// Repository files held in memory, keyed by name.
///
/// # Examples
///
/// ```
/// use aibom_extract::{InMemoryFiles, RepositoryFiles};
///
/// let files = InMemoryFiles::new().with_file("LICENSE", "MIT License\n");
/// assert_eq!(files.fetch_text("LICENSE").unwrap().as_deref(), Some("MIT License\n"));
/// assert!(files.fetch_text("COPYING").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryFiles {
    files: BTreeMap<String, String>,
}

impl InMemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl RepositoryFiles for InMemoryFiles {
    fn fetch_text(&self, filename: &str) -> Result<Option<String>> {
        Ok(self.files.get(filename).cloned())
    }
}

/// Repository files read from a local checkout or download cache.
#[derive(Debug, Clone)]
pub struct DirectoryFiles {
    root: PathBuf,
}

impl DirectoryFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RepositoryFiles for DirectoryFiles {
    fn fetch_text(&self, filename: &str) -> Result<Option<String>> {
        let relative = Path::new(filename);
        let plain = !filename.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(FetchError::InvalidName(filename.to_string()));
        }

        let path = self.root.join(relative);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FetchError::Io {
                name: filename.to_string(),
                source,
            }),
        }
    }
}
