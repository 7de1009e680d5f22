//! Upload Form - Frontend Rust/Leptos Application
//!
//! A WebAssembly page with a single form: pick a file, send it as a
//! multipart POST, watch the progress, read the server's answer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title)                                           │
//! │  └── UploadSection                                          │
//! │      ├── file input + submit button                         │
//! │      ├── ProgressLine ("Upload Progress: N%")               │
//! │      └── StatusLine (server message / failure)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (SelectedFile, TransferProgress, errors)
//! - [`state`] - Upload form state machine
//! - [`components`] - UI components
//! - [`services`] - Upload transport and submission driver

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod state;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Files
    SelectedFile,
    // Transfer
    TransferProgress, UploadReply,
    // Errors
    TransportError, UploadError, UploadResult,
};

// State
pub use state::{UploadForm, UploadPhase};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Upload Form - Starting Leptos App");

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Upload File"/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    view! {
        <div class="container">
            <Hero/>
            <UploadSection/>
        </div>
    }
}
