//! HTTP API module.
//!
//! This module provides the HTTP server and API types for the upload backend.

pub mod server;
pub mod types;

pub use server::{router, serve, start_server, AppState, FILE_FIELD};
pub use types::*;
