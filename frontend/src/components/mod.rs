//! UI Components for the upload form.
//!
//! # Layout Components
//! - [`Hero`] - Page title
//!
//! # Feature Components
//! - [`UploadSection`] - File picker, submit button and upload state
//! - [`ProgressLine`] - `Upload Progress: N%` while a transfer runs
//! - [`StatusLine`] - Outcome of the last submission

mod hero;
mod upload;
mod progress;

pub use hero::*;
pub use upload::*;
pub use progress::*;
