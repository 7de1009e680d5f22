//! Upload form state machine.
//!
//! ```text
//! Idle ─▶ Selecting ─▶ Ready(file) ─▶ Submitting(%) ─┬▶ Succeeded(message)
//!              ▲            ▲                          └▶ Failed(reason)
//!              └────────────┴──────────────── (file is kept) ┘
//! ```
//!
//! `Succeeded` and `Failed` still hold the file, so they accept the same
//! transitions as `Ready`. While `Submitting`, both selection and a second
//! submit are refused.

use crate::config::{FAILURE_MESSAGE, NO_FILE_MESSAGE};
use crate::types::{
    SelectedFile, TransferProgress, TransportError, UploadError, UploadReply, UploadResult,
};

/// Where the form is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    /// Nothing selected yet.
    Idle,
    /// File picker is open.
    Selecting,
    /// A file is selected and can be submitted.
    Ready,
    /// Request in flight with the displayed percentage.
    Submitting { progress: u8 },
    /// Server accepted the file.
    Succeeded { message: String },
    /// Request failed; `reason` keeps the precise transport error.
    Failed { reason: String },
}

/// State of one upload form.
#[derive(Clone, Debug)]
pub struct UploadForm<B = web_sys::File> {
    file: Option<SelectedFile<B>>,
    phase: UploadPhase,
    status: String,
}

impl<B> Default for UploadForm<B> {
    fn default() -> Self {
        Self {
            file: None,
            phase: UploadPhase::Idle,
            status: String::new(),
        }
    }
}

impl<B> UploadForm<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn file(&self) -> Option<&SelectedFile<B>> {
        self.file.as_ref()
    }

    /// Status message; empty when there is nothing to show.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, UploadPhase::Submitting { .. })
    }

    /// Displayed percentage, 0 outside of a submission.
    pub fn progress(&self) -> u8 {
        match self.phase {
            UploadPhase::Submitting { progress } => progress,
            _ => 0,
        }
    }

    /// `"Upload Progress: N%"`, only while N > 0.
    pub fn progress_text(&self) -> Option<String> {
        match self.progress() {
            0 => None,
            n => Some(format!("Upload Progress: {}%", n)),
        }
    }

    /// The picker was opened.
    pub fn begin_selection(&mut self) -> UploadResult<()> {
        if self.is_submitting() {
            return Err(UploadError::AlreadySubmitting);
        }
        self.phase = UploadPhase::Selecting;
        Ok(())
    }

    /// The picker was closed without a choice.
    pub fn cancel_selection(&mut self) {
        if self.phase == UploadPhase::Selecting {
            self.phase = self.resting_phase();
        }
    }

    /// Store a new selection, replacing any previous one.
    pub fn select_file(&mut self, file: SelectedFile<B>) -> UploadResult<()> {
        if self.is_submitting() {
            return Err(UploadError::AlreadySubmitting);
        }
        self.file = Some(file);
        self.phase = UploadPhase::Ready;
        Ok(())
    }

    /// The picker was closed, through a `change` event (`file` may be
    /// empty) or a `cancel` event (`file` is `None`).
    pub fn picker_closed(&mut self, file: Option<SelectedFile<B>>) -> UploadResult<()> {
        match file {
            Some(file) => self.select_file(file),
            None => {
                self.cancel_selection();
                Ok(())
            }
        }
    }

    /// Record a progress report. Returns the new percentage if the
    /// displayed value went up.
    pub fn record_progress(&mut self, report: TransferProgress) -> Option<u8> {
        let UploadPhase::Submitting { progress } = &mut self.phase else {
            return None;
        };
        let percent = report.percent()?;
        if percent > *progress {
            *progress = percent;
            Some(percent)
        } else {
            None
        }
    }

    /// Apply the outcome of the in-flight request. Ignored when no
    /// request is in flight.
    pub fn finish(&mut self, outcome: &Result<UploadReply, TransportError>) {
        if !self.is_submitting() {
            return;
        }
        match outcome {
            Ok(reply) => {
                self.status = reply.message.clone();
                self.phase = UploadPhase::Succeeded {
                    message: reply.message.clone(),
                };
            }
            Err(e) => {
                self.status = FAILURE_MESSAGE.to_string();
                self.phase = UploadPhase::Failed {
                    reason: e.to_string(),
                };
            }
        }
    }

    fn resting_phase(&self) -> UploadPhase {
        if self.file.is_some() {
            UploadPhase::Ready
        } else {
            UploadPhase::Idle
        }
    }
}

impl<B: Clone> UploadForm<B> {
    /// Start a submission and hand back the file to send.
    ///
    /// Without a file the status becomes the "please select" message and
    /// nothing is sent.
    pub fn begin_submit(&mut self) -> UploadResult<SelectedFile<B>> {
        if self.is_submitting() {
            return Err(UploadError::AlreadySubmitting);
        }
        let Some(file) = self.file.clone() else {
            self.status = NO_FILE_MESSAGE.to_string();
            return Err(UploadError::NoFileSelected);
        };
        self.status.clear();
        self.phase = UploadPhase::Submitting { progress: 0 };
        Ok(file)
    }
}
