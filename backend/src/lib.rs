//! # fileupload - single-file upload server and client
//!
//! Receives one file per request as the multipart field `file`, checks it
//! against an upload policy and writes it to an object store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Multipart  │────▶│   Server    │────▶│   Policy    │────▶│ ObjectStore │
//! │ POST /upload│     │   (axum)    │     │ (size/type) │     │   (local)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fileupload::{ServerConfig, server::start_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     start_server(ServerConfig::from_env().unwrap()).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Environment configuration
//! - [`upload`] - Upload policy and object keys
//! - [`storage`] - Object stores
//! - [`api`] - HTTP API server
//! - [`client`] - Command-line upload client

// Core modules
pub mod error;
pub mod config;

// Upload handling
pub mod upload;
pub mod storage;

// HTTP
pub mod api;
pub mod client;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ClientError, ConfigError, PolicyError, ServerError, StorageError};

pub use config::ServerConfig;

pub use upload::{object_key, sanitize_file_name, UploadPolicy};

pub use storage::{LocalStore, ObjectStore, StoredObject};

pub use api::types::{UploadResponse, SUCCESS_MESSAGE};

pub use client::{send_file, ProgressTracker, DEFAULT_UPLOAD_URL, FAILURE_MESSAGE};

// Server
pub mod server {
    pub use crate::api::server::{router, serve, start_server, AppState};
}
