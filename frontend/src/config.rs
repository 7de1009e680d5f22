//! Application configuration.
//!
//! Centralized configuration for the upload form.
//! In development, these are hardcoded. In production, they could be
//! loaded from environment or a config file.

/// Upload endpoint.
///
/// Served by `fileupload serve` from the backend crate.
pub const UPLOAD_URL: &str = "http://localhost:8080/upload";

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Request timeout for an upload (in milliseconds).
///
/// 5 minutes. `0` disables the timeout.
pub const UPLOAD_TIMEOUT_MS: u32 = 5 * 60 * 1000;

/// Status shown when submitting without a file.
pub const NO_FILE_MESSAGE: &str = "Please select a file to upload";

/// Status shown for any failed upload.
pub const FAILURE_MESSAGE: &str = "Failed to upload file";
