//! REST API types shared by the server and the command-line client.
//!
//! The browser form only relies on `message`; the other fields are for
//! scripted clients.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::storage::StoredObject;

/// Message returned for a stored upload.
pub const SUCCESS_MESSAGE: &str = "success upload to storage";

/// Body of every `/upload` response, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Whether the file was stored
    pub success: bool,

    /// Human-readable outcome, shown verbatim by the form
    pub message: String,

    /// Key of the stored object
    #[serde(default)]
    pub key: Option<String>,

    /// Stored size in bytes (0 on failure)
    #[serde(default)]
    pub size: u64,
}

impl UploadResponse {
    /// Response for a successfully stored object.
    pub fn stored(object: &StoredObject) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            key: Some(object.key.clone()),
            size: object.size,
        }
    }

    /// Response for a refused or failed upload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            key: None,
            size: 0,
        }
    }
}

/// Body of `GET /health`.
pub fn health_report() -> Value {
    json!({
        "status": "ok",
        "service": "fileupload",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /upload (multipart, field \"file\")"
        }
    })
}
