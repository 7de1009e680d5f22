//! Progress and status lines shown under the form.

use leptos::*;

/// Upload percentage; renders nothing while it is 0.
#[component]
pub fn ProgressLine(#[prop(into)] text: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show
            when=move || text.with(Option::is_some)
            fallback=|| view! { }
        >
            <p class="upload-progress">{move || text.get().unwrap_or_default()}</p>
        </Show>
    }
}

/// Status message; renders nothing while it is empty.
#[component]
pub fn StatusLine(#[prop(into)] message: Signal<String>) -> impl IntoView {
    view! {
        <Show
            when=move || message.with(|m| !m.is_empty())
            fallback=|| view! { }
        >
            <p class="upload-status">{move || message.get()}</p>
        </Show>
    }
}
