//! Upload policy - what the server accepts and how it names stored objects.

use std::path::Path;

use uuid::Uuid;

use crate::config::DEFAULT_MAX_SIZE;
use crate::error::{PolicyError, PolicyResult};

/// Content type used when the client sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Limits applied to every uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum file size in bytes
    pub max_size: u64,
    /// Lowercase extensions without dot; empty means any type
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            allowed_extensions: Vec::new(),
        }
    }
}

impl UploadPolicy {
    /// Replace the allow-list. Entries are trimmed, lowercased and
    /// stripped of a leading dot; blanks are dropped.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Check a file against the policy.
    pub fn check(&self, file_name: &str, size: u64) -> PolicyResult<()> {
        if size > self.max_size {
            return Err(PolicyError::TooLarge {
                size,
                limit: self.max_size,
            });
        }

        if self.allowed_extensions.is_empty() {
            return Ok(());
        }

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if self.allowed_extensions.iter().any(|allowed| *allowed == ext) {
            Ok(())
        } else {
            Err(PolicyError::ExtensionNotAllowed(if ext.is_empty() {
                file_name.to_string()
            } else {
                ext
            }))
        }
    }
}

/// Key under which an uploaded file is stored: `<uuid>-<sanitized name>`.
pub fn object_key(file_name: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name))
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Only the last path segment is kept; anything outside `[A-Za-z0-9._-]`
/// becomes `_`, and leading dots are dropped.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned.to_string()
    }
}
