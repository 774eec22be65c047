//! License detection from repository files.
//!
//! The only strategy that performs secondary retrieval during the chain.

use serde_json::{Value, json};
use tracing::{debug, warn};

use aibom_core::Strategy;
use aibom_core::license::detect_license_header;
use aibom_registry::FieldDefinition;

use super::{FieldStrategy, is_license_field};
use crate::context::ExtractionContext;
use crate::source::RepositoryFiles;

/// Candidate license files, probed in order.
pub const LICENSE_FILENAMES: &[&str] = &["LICENSE", "LICENSE.txt", "LICENSE.md", "LICENSE.rst", "COPYING"];

/// Bytes of each file inspected for a header phrase.
pub const SNIPPET_BYTES: usize = 4096;

/// Probes the candidate license files and maps the first recognized header
/// phrase to an SPDX identifier.
///
/// Missing files and fetch errors move on to the next candidate.
pub fn detect_license_from_files(files: &dyn RepositoryFiles) -> Option<String> {
    for filename in LICENSE_FILENAMES {
        let text = match files.fetch_text(filename) {
            Ok(Some(text)) => text,
            Ok(None) => continue,
            Err(err) => {
                warn!(file = filename, error = %err, "license file probe failed");
                continue;
            }
        };
        if let Some(spdx) = detect_license_header(snippet(&text, SNIPPET_BYTES)) {
            debug!(file = filename, license = spdx, "license detected from file");
            return Some(spdx.to_string());
        }
    }
    None
}

/// Longest prefix of `text` no longer than `max_bytes`, cut on a char
/// boundary.
fn snippet(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Strategy 6: license file probe, license-type fields only.
pub struct LicenseFileStrategy;

impl FieldStrategy for LicenseFileStrategy {
    fn kind(&self) -> Strategy {
        Strategy::LicenseFile
    }

    fn applies(&self, field: &str, definition: &FieldDefinition, context: &ExtractionContext) -> bool {
        context.files().is_some() && is_license_field(field, definition)
    }

    fn extract(
        &self,
        _field: &str,
        _definition: &FieldDefinition,
        context: &ExtractionContext,
    ) -> Option<Value> {
        detect_license_from_files(context.files()?).map(|spdx| json!(spdx))
    }
}
