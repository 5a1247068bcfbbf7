//! Upload form markup.
//!
//! Renders the file input, the progress bar and the media list. Behaviour is
//! attached afterwards by [`crate::services::bind_uploader`], which finds the
//! elements through the default selectors.

use leptos::*;

use crate::config::upload_url_endpoint;

#[component]
pub fn UploadSection() -> impl IntoView {
    view! {
        <div class="upload-section" id="uploadZone">
            <div class="upload-icon">"📤"</div>
            <label for="file-input" class="upload-button">
                "Choose images"
            </label>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                multiple=true
                style="display:none"
                data-upload-url=upload_url_endpoint()
            />
            <progress id="upload-progress" max="100" value="0">"0"</progress>
        </div>

        <div class="media-list" id="images"></div>
    }
}
