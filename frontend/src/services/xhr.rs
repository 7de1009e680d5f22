//! Browser transport built on `XMLHttpRequest`.
//!
//! `fetch` cannot report request-body progress, so uploads go through
//! XHR and its `upload.onprogress` events.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, FormData, ProgressEvent, XmlHttpRequest};

use super::upload::{ProgressSink, UploadTransport};
use crate::config::{FILE_FIELD, UPLOAD_TIMEOUT_MS, UPLOAD_URL};
use crate::types::{SelectedFile, TransferProgress, TransportError, UploadReply};

/// How an XHR ended, as told by its event handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Settled {
    Loaded,
    Error,
    Timeout,
    Abort,
}

type Settle = Rc<RefCell<Option<oneshot::Sender<Settled>>>>;

/// Multipart POST via `XMLHttpRequest`.
#[derive(Clone, Debug)]
pub struct XhrTransport {
    url: String,
    timeout_ms: u32,
}

impl Default for XhrTransport {
    fn default() -> Self {
        Self::new(UPLOAD_URL)
    }
}

impl XhrTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: UPLOAD_TIMEOUT_MS,
        }
    }

    /// Request timeout in milliseconds; `0` waits forever.
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl UploadTransport for XhrTransport {
    type Blob = File;

    async fn send(
        &self,
        file: &SelectedFile<File>,
        progress: ProgressSink,
    ) -> Result<UploadReply, TransportError> {
        let form_data = FormData::new().map_err(setup_error)?;
        form_data
            .append_with_blob_and_filename(FILE_FIELD, &file.blob, &file.name)
            .map_err(setup_error)?;

        let xhr = XmlHttpRequest::new().map_err(setup_error)?;
        xhr.open_with_async("POST", &self.url, true)
            .map_err(setup_error)?;
        xhr.set_timeout(self.timeout_ms);

        let upload = xhr.upload().map_err(setup_error)?;
        let on_progress = Closure::wrap(Box::new(move |event: ProgressEvent| {
            if event.length_computable() {
                progress(TransferProgress::new(event.loaded() as u64, event.total() as u64));
            }
        }) as Box<dyn FnMut(ProgressEvent)>);
        upload.set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

        let (tx, rx) = oneshot::channel();
        let settle: Settle = Rc::new(RefCell::new(Some(tx)));

        let on_load = settle_with(&settle, Settled::Loaded);
        let on_error = settle_with(&settle, Settled::Error);
        let on_timeout = settle_with(&settle, Settled::Timeout);
        let on_abort = settle_with(&settle, Settled::Abort);
        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        xhr.set_ontimeout(Some(on_timeout.as_ref().unchecked_ref()));
        xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));

        let outcome = match xhr.send_with_opt_form_data(Some(&form_data)) {
            Ok(()) => rx.await.unwrap_or(Settled::Abort),
            Err(e) => {
                detach(&xhr);
                return Err(setup_error(e));
            }
        };

        // Closures are dropped on return; unhook them first
        detach(&xhr);

        match outcome {
            Settled::Loaded => {
                let status = xhr.status().map_err(setup_error)?;
                let body = xhr
                    .response_text()
                    .map_err(setup_error)?
                    .unwrap_or_default();
                parse_reply(status, &body)
            }
            Settled::Error => Err(TransportError::Network),
            Settled::Timeout => Err(TransportError::Timeout),
            Settled::Abort => Err(TransportError::Aborted),
        }
    }
}

fn settle_with(settle: &Settle, outcome: Settled) -> Closure<dyn FnMut(Event)> {
    let settle = settle.clone();
    Closure::wrap(Box::new(move |_: Event| {
        if let Some(tx) = settle.borrow_mut().take() {
            let _ = tx.send(outcome);
        }
    }) as Box<dyn FnMut(Event)>)
}

fn detach(xhr: &XmlHttpRequest) {
    xhr.set_onload(None);
    xhr.set_onerror(None);
    xhr.set_ontimeout(None);
    xhr.set_onabort(None);
    if let Ok(upload) = xhr.upload() {
        upload.set_onprogress(None);
    }
}

fn setup_error(e: JsValue) -> TransportError {
    TransportError::Setup(format!("{:?}", e))
}

/// Interpret a completed response.
pub fn parse_reply(status: u16, body: &str) -> Result<UploadReply, TransportError> {
    if !(200..300).contains(&status) {
        return Err(TransportError::Status {
            status,
            body: body.to_string(),
        });
    }

    serde_json::from_str::<UploadReply>(body)
        .map_err(|e| TransportError::InvalidResponse(e.to_string()))
}
