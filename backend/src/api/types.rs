//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub use crate::models::MediaItem;

/// Response of `GET /api/upload_url`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadUrlResponse {
    /// One-time destination for the multipart POST
    pub url: String,
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}
