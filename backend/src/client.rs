//! Command-line upload client.
//!
//! Streams a local file to an upload endpoint as the multipart field
//! `file`, reporting progress as the body is handed to the connection.

use std::path::Path;

use bytes::Bytes;
use reqwest::{
    multipart::{Form, Part},
    Body,
};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::api::types::UploadResponse;
use crate::api::server::FILE_FIELD;
use crate::error::{ClientError, ClientResult};
use crate::upload::DEFAULT_CONTENT_TYPE;

/// Endpoint the browser form posts to.
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:8080/upload";

/// Message shown for any failed upload.
pub const FAILURE_MESSAGE: &str = "Failed to upload file";

const CHUNK_SIZE: usize = 64 * 1024;

/// Turns `loaded/total` reports into a non-decreasing percentage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTracker {
    percent: u8,
}

impl ProgressTracker {
    /// Current percentage.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Record a report. Returns the new percentage when it went up.
    pub fn record(&mut self, loaded: u64, total: u64) -> Option<u8> {
        if total == 0 {
            return None;
        }
        let percent = ((loaded as f64 * 100.0 / total as f64).round()).clamp(0.0, 100.0) as u8;
        if percent > self.percent {
            self.percent = percent;
            Some(percent)
        } else {
            None
        }
    }
}

/// Upload `path` to `url`, calling `on_progress` each time the
/// percentage increases.
pub async fn send_file<F>(url: &str, path: &Path, on_progress: F) -> ClientResult<UploadResponse>
where
    F: FnMut(u8) + Send + 'static,
{
    let file = File::open(path).await?;
    let total = file.metadata().await?.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string());

    tracing::info!(file = %file_name, bytes = total, url, "sending file");

    let part = Part::stream_with_length(progress_body(file, total, on_progress), total)
        .file_name(file_name)
        .mime_str(DEFAULT_CONTENT_TYPE)?;
    let form = Form::new().part(FILE_FIELD, part);

    let response = reqwest::Client::new()
        .post(url)
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<UploadResponse>(&text)
            .map(|r| r.message)
            .unwrap_or(text);
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json::<UploadResponse>().await?)
}

/// Read position of a file being streamed.
struct ChunkReader<F> {
    file: File,
    total: u64,
    loaded: u64,
    tracker: ProgressTracker,
    on_progress: F,
}

async fn next_chunk<F>(mut reader: ChunkReader<F>) -> std::io::Result<Option<(Bytes, ChunkReader<F>)>>
where
    F: FnMut(u8),
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let n = reader.file.read(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);

    reader.loaded += n as u64;
    if let Some(percent) = reader.tracker.record(reader.loaded, reader.total) {
        (reader.on_progress)(percent);
    }
    Ok(Some((Bytes::from(buf), reader)))
}

fn progress_body<F>(file: File, total: u64, on_progress: F) -> Body
where
    F: FnMut(u8) + Send + 'static,
{
    let reader = ChunkReader {
        file,
        total,
        loaded: 0,
        tracker: ProgressTracker::default(),
        on_progress,
    };
    Body::wrap_stream(futures::stream::try_unfold(reader, next_chunk))
}
