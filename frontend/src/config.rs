//! Application configuration.
//!
//! Centralized configuration for the imagedrop frontend.
//! In development, these are hardcoded. In production, the hosting page
//! can point the input's `data-upload-url` somewhere else.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Path of the endpoint handing out one-time upload URLs.
pub const UPLOAD_URL_PATH: &str = "/api/upload_url";

/// Path listing media already stored by the backend.
pub const MEDIA_LIST_PATH: &str = "/api/media";

/// Name of the `data-*` attribute on the file input holding the endpoint,
/// as seen through `HTMLElement.dataset`.
pub const UPLOAD_URL_DATA_KEY: &str = "uploadUrl";

/// Suffix appended to a serving URL to request a 100px square crop.
pub const THUMBNAIL_SUFFIX: &str = "=s100-c";

/// Default selector of the media list container.
pub const DEFAULT_LIST_SELECTOR: &str = "#images";

/// Default selector of the file input.
pub const DEFAULT_INPUT_SELECTOR: &str = "#file-input";

/// Default selector of the progress indicator.
pub const DEFAULT_PROGRESS_SELECTOR: &str = "#upload-progress";

/// Full URL of the upload-URL endpoint on the bundled backend.
pub fn upload_url_endpoint() -> String {
    format!("{}{}", BACKEND_URL, UPLOAD_URL_PATH)
}
