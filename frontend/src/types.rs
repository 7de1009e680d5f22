//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **File Types** - the user's selection
//! - **Transfer Types** - progress reports and the server reply
//! - **Error Types** - local and transport failures

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// File Types
// =============================================================================

/// A file chosen by the user.
///
/// `B` is the opaque payload; in the browser it is a [`web_sys::File`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile<B = web_sys::File> {
    /// File name as reported by the picker
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Binary content
    pub blob: B,
}

impl<B> SelectedFile<B> {
    pub fn new(name: impl Into<String>, size: u64, blob: B) -> Self {
        Self {
            name: name.into(),
            size,
            blob,
        }
    }

    /// Human-readable size ("512 B", "1.5 KB", "2.0 MB").
    pub fn display_size(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;
        const GB: f64 = MB * 1024.0;

        let size = self.size as f64;
        if size >= GB {
            format!("{:.1} GB", size / GB)
        } else if size >= MB {
            format!("{:.1} MB", size / MB)
        } else if size >= KB {
            format!("{:.1} KB", size / KB)
        } else {
            format!("{} B", self.size)
        }
    }
}

impl SelectedFile<web_sys::File> {
    /// Wrap a file from an `<input type="file">`.
    pub fn from_file(file: web_sys::File) -> Self {
        Self::new(file.name(), file.size() as u64, file)
    }
}

// =============================================================================
// Transfer Types
// =============================================================================

/// Cumulative bytes sent vs. total, as reported by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferProgress {
    pub loaded: u64,
    pub total: u64,
}

impl TransferProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    /// `round(loaded * 100 / total)` clamped to [0, 100].
    ///
    /// `None` when the total is unknown.
    pub fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let ratio = self.loaded as f64 * 100.0 / self.total as f64;
        Some(ratio.round().clamp(0.0, 100.0) as u8)
    }
}

/// Successful reply of the upload endpoint.
///
/// Only `message` is required; it is shown to the user verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadReply {
    pub message: String,
}

// =============================================================================
// Error Types
// =============================================================================

/// Ways a request can fail once it has been handed to the transport.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TransportError {
    /// The request could not be built or sent.
    #[error("Failed to build request: {0}")]
    Setup(String),

    /// Connection refused, DNS, CORS...
    #[error("Network error")]
    Network,

    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Request aborted before completion.
    #[error("Request aborted")]
    Aborted,

    /// Server answered with a non-2xx status.
    #[error("Server error ({status}): {body}")]
    Status { status: u16, body: String },

    /// 2xx reply without a usable `message`.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Frontend upload errors.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum UploadError {
    /// Submit without a selection; no request is made.
    #[error("No file selected")]
    NoFileSelected,

    /// A submission is in flight.
    #[error("An upload is already in progress")]
    AlreadySubmitting,

    /// The form's state was disposed before the request completed.
    #[error("Upload form is no longer mounted")]
    Unmounted,

    /// The request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type alias for frontend upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(TransferProgress::new(5, 10).percent(), Some(50));
        assert_eq!(TransferProgress::new(10, 10).percent(), Some(100));
        assert_eq!(TransferProgress::new(1, 3).percent(), Some(33));
        assert_eq!(TransferProgress::new(2, 3).percent(), Some(67));
        assert_eq!(TransferProgress::new(1, 200).percent(), Some(1));
        assert_eq!(TransferProgress::new(0, 10).percent(), Some(0));
    }

    #[test]
    fn test_percent_clamped_and_unknown_total() {
        assert_eq!(TransferProgress::new(15, 10).percent(), Some(100));
        assert_eq!(TransferProgress::new(5, 0).percent(), None);
    }

    #[test]
    fn test_display_size() {
        assert_eq!(SelectedFile::new("a.txt", 10, ()).display_size(), "10 B");
        assert_eq!(SelectedFile::new("b", 1536, ()).display_size(), "1.5 KB");
        assert_eq!(SelectedFile::new("c", 2 * 1024 * 1024, ()).display_size(), "2.0 MB");
    }

    #[test]
    fn test_reply_ignores_extra_fields() {
        let reply: UploadReply = serde_json::from_str(
            r#"{"success": true, "message": "success upload to storage", "key": "k", "size": 3}"#,
        )
        .unwrap();
        assert_eq!(reply.message, "success upload to storage");
    }

    #[test]
    fn test_transport_error_wraps() {
        let err: UploadError = TransportError::Timeout.into();
        assert_eq!(err.to_string(), "Request timed out");
    }
}
