//! HTTP server for the upload endpoint.
//!
//! # API Endpoints
//!
//! | Method | Path      | Description                                  |
//! |--------|-----------|----------------------------------------------|
//! | GET    | `/health` | Health check                                 |
//! | POST   | `/upload` | Multipart upload, single field `file`        |

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use super::types::{health_report, UploadResponse};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::storage::{LocalStore, ObjectStore};
use crate::upload::{object_key, DEFAULT_CONTENT_TYPE};

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// State shared by all handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// State backed by a [`LocalStore`] at the configured directory.
    pub fn local(config: ServerConfig) -> Self {
        let store = Arc::new(LocalStore::new(&config.storage_dir));
        Self { config, store }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    // The form is served from another origin (trunk dev server)
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let body_limit = state.config.body_limit();

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route(
            "/upload",
            post(upload_file).fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server with a local object store.
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        "upload server running on http://localhost:{} (storage: {}, limit: {} bytes)",
        config.port,
        config.storage_dir.display(),
        config.policy.max_size
    );
    if !config.policy.allowed_extensions.is_empty() {
        tracing::info!(
            "accepted extensions: {}",
            config.policy.allowed_extensions.join(", ")
        );
    }

    serve(listener, Arc::new(AppState::local(config))).await?;
    Ok(())
}

/// Serve the router on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(health_report())
}

async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

/// File part pulled out of the form.
struct FilePart {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

/// Upload endpoint
async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart.map_err(|e| ServerError::MalformedForm(e.body_text()))?;
    let limit = state.config.body_limit();

    let part = read_file_part(&mut multipart, limit)
        .await?
        .ok_or(ServerError::MissingFile)?;

    tracing::info!(
        file = %part.file_name,
        bytes = part.bytes.len(),
        content_type = %part.content_type,
        "upload received"
    );

    state
        .config
        .policy
        .check(&part.file_name, part.bytes.len() as u64)?;

    let key = object_key(&part.file_name);
    let stored = state.store.put(&key, part.bytes, &part.content_type).await?;

    tracing::info!(key = %stored.key, size = stored.size, "upload stored");

    Ok((StatusCode::OK, Json(UploadResponse::stored(&stored))))
}

/// Find the first `file` field carrying a file; other fields, and plain
/// text values named `file`, are skipped.
async fn read_file_part(multipart: &mut Multipart, limit: usize) -> ServerResult<Option<FilePart>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            tracing::debug!("skipping `file` field without a filename");
            continue;
        };

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        return Ok(Some(FilePart {
            file_name,
            content_type,
            bytes,
        }));
    }

    Ok(None)
}

fn multipart_error(e: MultipartError, limit: usize) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge { limit }
    } else {
        ServerError::MalformedForm(e.body_text())
    }
}
