//! Upload services.
//!
//! # Services
//!
//! - [`upload`] - transport trait and the submission driver
//! - [`xhr`] - browser transport over `XMLHttpRequest` with upload progress

pub mod upload;
pub mod xhr;

pub use upload::*;
pub use xhr::*;
