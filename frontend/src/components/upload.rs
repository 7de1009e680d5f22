//! Upload form component.
//!
//! Handles file selection, submission to the upload endpoint, progress
//! display and the outcome message.

use std::rc::Rc;

use leptos::*;
use web_sys::{Event, File, HtmlInputElement};

use super::{ProgressLine, StatusLine};
use crate::services::{submit, XhrTransport};
use crate::state::UploadForm;
use crate::types::{SelectedFile, UploadError};

#[component]
pub fn UploadSection() -> impl IntoView {
    let form = create_rw_signal(UploadForm::<File>::new());
    let transport = Rc::new(XhrTransport::default());

    let is_submitting = move || form.with(UploadForm::is_submitting);

    // Picker opened
    let on_picker_open = move |_| {
        if let Some(Err(e)) = form.try_update(|f| f.begin_selection()) {
            log::warn!("Picker opened during upload: {}", e);
        }
    };

    // Picker closed, with or without a file
    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let selected = input
            .files()
            .and_then(|files| files.get(0))
            .map(SelectedFile::from_file);

        if let Some(file) = &selected {
            log::info!("📄 Selected {} ({})", file.name, file.display_size());
        }
        if let Some(Err(e)) = form.try_update(|f| f.picker_closed(selected)) {
            log::warn!("Selection ignored: {}", e);
        }
    };

    // Picker dismissed (browsers that fire `cancel` instead of `change`)
    let on_picker_cancel = move |_: Event| {
        if let Some(Err(e)) = form.try_update(|f| f.picker_closed(None)) {
            log::warn!("Picker cancel ignored: {}", e);
        }
    };

    let on_submit = move |event: ev::SubmitEvent| {
        event.prevent_default();
        let transport = transport.clone();

        spawn_local(async move {
            match submit(&form, transport.as_ref()).await {
                Ok(_) => {}
                Err(UploadError::NoFileSelected) => log::info!("Nothing to upload"),
                Err(UploadError::AlreadySubmitting) => {
                    log::warn!("Upload already in progress, submit ignored")
                }
                // Already logged by the service
                Err(_) => {}
            }
        });
    };

    let selected = move || {
        form.with(|f| {
            f.file()
                .map(|file| format!("{} ({})", file.name, file.display_size()))
        })
    };

    view! {
        <div class="upload-section" id="uploadZone">
            <form on:submit=on_submit>
                <input
                    type="file"
                    id="fileInput"
                    on:click=on_picker_open
                    on:change=on_file_change
                    on:cancel=on_picker_cancel
                    prop:disabled=is_submitting
                />
                <button type="submit" class="upload-button" prop:disabled=is_submitting>
                    {move || if is_submitting() { "Uploading..." } else { "Upload" }}
                </button>
            </form>

            <Show
                when=move || selected().is_some()
                fallback=|| view! { }
            >
                <div class="upload-hint">{move || selected().unwrap_or_default()}</div>
            </Show>

            <ProgressLine text=Signal::derive(move || form.with(UploadForm::progress_text))/>
            <StatusLine message=Signal::derive(move || form.with(|f| f.status().to_string()))/>
        </div>
    }
}
