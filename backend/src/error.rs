//! Error types for the upload server and client.
//!
//! - [`ConfigError`] - environment / flag configuration errors
//! - [`PolicyError`] - upload policy rejections
//! - [`StorageError`] - object store errors
//! - [`ServerError`] - request-level errors, mapped to HTTP responses
//! - [`ClientError`] - command-line upload client errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::api::types::UploadResponse;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

// =============================================================================
// Policy Errors
// =============================================================================

/// Reasons an upload is refused before it reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// File is bigger than the configured limit.
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// File extension is not in the allow-list.
    #[error("File type not allowed: {0}")]
    ExtensionNotAllowed(String),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from an object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key would escape the store root or is empty.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// IO error.
    #[error("Storage IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// Request-level errors of the upload endpoint.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Anything but `POST` on `/upload`.
    #[error("Invalid request method")]
    MethodNotAllowed,

    /// Body is not a readable multipart form.
    #[error("Unable to parse form")]
    MalformedForm(String),

    /// No `file` field in the form.
    #[error("File is required")]
    MissingFile,

    /// Request body hit the body limit before the form was read.
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Upload policy refused the file.
    #[error("{0}")]
    Policy(#[from] PolicyError),

    /// Object store failed.
    #[error("Failed to upload file to storage")]
    Storage(#[from] StorageError),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::MalformedForm(_) | ServerError::MissingFile => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge { .. }
            | ServerError::Policy(PolicyError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Policy(PolicyError::ExtensionNotAllowed(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ServerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::Storage(e) => tracing::error!(error = %e, "store rejected upload"),
            ServerError::MalformedForm(detail) => {
                tracing::warn!(%detail, "unreadable multipart body")
            }
            other => tracing::warn!(error = %other, "upload refused"),
        }
        (self.status(), Json(UploadResponse::failure(self.to_string()))).into_response()
    }
}

// =============================================================================
// Client Errors
// =============================================================================

/// Errors of the command-line upload client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not read the local file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Connection, timeout or body error.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for policy checks.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for request handling.
pub type ServerResult<T> = Result<T, ServerError>;

/// Result type for the upload client.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // PolicyError -> ServerError
        let policy_err = PolicyError::ExtensionNotAllowed("exe".into());
        let server_err: ServerError = policy_err.into();
        assert!(server_err.to_string().contains("exe"));
        assert_eq!(server_err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        // StorageError -> ServerError hides the IO detail from the client
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let server_err: ServerError = StorageError::from(io).into();
        assert_eq!(server_err.to_string(), "Failed to upload file to storage");
        assert_eq!(server_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ServerError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::MalformedForm("boundary".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServerError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        let too_large = ServerError::Policy(PolicyError::TooLarge { size: 10, limit: 5 });
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body_limit = ServerError::PayloadTooLarge { limit: 5 };
        assert_eq!(body_limit.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
