//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **API Types** - Backend response structures
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// API Types
// =============================================================================

/// One-time upload destination returned by the upload-URL endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadTarget {
    /// Destination of the multipart POST
    pub url: String,
}

impl UploadTarget {
    /// Parse and check an endpoint response body.
    pub fn from_json(body: &str) -> AppResult<Self> {
        let target: UploadTarget = serde_json::from_str(body)
            .map_err(|e| AppError::Validation(format!("upload target: {}", e)))?;
        if target.url.trim().is_empty() {
            return Err(AppError::Validation("upload target has an empty url".into()));
        }
        Ok(target)
    }
}

/// Metadata for one uploaded file, as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Serving URL of the image
    pub url: String,
    /// Bucket key, once migrated
    pub gs_key: Option<String>,
    /// Blob store key, until cleaned up
    pub blob_key: Option<String>,
    /// ISO-8601 timestamp of the last update
    pub updated: String,
}

impl MediaItem {
    /// Parse an upload or listing response body.
    pub fn list_from_json(body: &str) -> AppResult<Vec<Self>> {
        serde_json::from_str(body).map_err(|e| AppError::Validation(format!("media items: {}", e)))
    }
}

/// Which of the two requests of an upload action a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStep {
    /// GET on the upload-URL endpoint.
    FetchTarget,
    /// Multipart POST to the destination.
    Upload,
    /// GET on the media listing.
    ListMedia,
}

impl fmt::Display for RequestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStep::FetchTarget => write!(f, "fetching upload URL"),
            RequestStep::Upload => write!(f, "uploading files"),
            RequestStep::ListMedia => write!(f, "listing media"),
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// A required element is not on the page.
    MissingElement(String),
    /// The file input carries no upload endpoint.
    MissingEndpoint,
    /// The request could not be sent or completed.
    Network(String),
    /// The server answered with something other than 200.
    Status { step: RequestStep, status: u16 },
    /// The response body did not have the expected shape.
    Validation(String),
    /// A DOM call failed.
    Dom(String),
}

impl AppError {
    /// Wrap a JavaScript exception raised by a DOM call.
    pub fn dom(err: wasm_bindgen::JsValue) -> Self {
        AppError::Dom(format!("{:?}", err))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingElement(sel) => write!(f, "Could not find element {}", sel),
            AppError::MissingEndpoint => write!(f, "Can't upload to nowhere: no upload URL configured"),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Status { step, status } => {
                write!(f, "Server answered {} while {}", status, step)
            }
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Dom(msg) => write!(f, "DOM error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
