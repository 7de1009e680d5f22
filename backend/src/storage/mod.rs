//! Object store - where accepted uploads are written.
//!
//! [`ObjectStore`] is the seam between the HTTP layer and the storage
//! backend. [`LocalStore`] keeps objects as plain files under a root
//! directory.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::error::{StorageError, StorageResult};

/// An object written by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key the object is addressable by
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type reported by the client
    pub content_type: String,
}

/// Destination for uploaded files.
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any previous object.
    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Bytes,
        content_type: &'a str,
    ) -> BoxFuture<'a, StorageResult<StoredObject>>;
}

/// Store keeping each object as a file named after its key.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    async fn write(&self, key: &str, body: Bytes, content_type: &str) -> StorageResult<StoredObject> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, &body).await?;

        tracing::debug!(path = %path.display(), bytes = body.len(), "object written");

        Ok(StoredObject {
            key: key.to_string(),
            size: body.len() as u64,
            content_type: content_type.to_string(),
        })
    }
}

impl ObjectStore for LocalStore {
    fn put<'a>(
        &'a self,
        key: &'a str,
        body: Bytes,
        content_type: &'a str,
    ) -> BoxFuture<'a, StorageResult<StoredObject>> {
        Box::pin(self.write(key, body, content_type))
    }
}

/// Keys must be a single, non-hidden path component.
fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
