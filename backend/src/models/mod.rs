//! Domain models.
//!
//! - [`MediaRecord`] - A stored image with its blob and bucket references
//! - [`MediaItem`] - What clients receive for each record

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Media Record
// =============================================================================

/// A stored image.
///
/// New uploads only reference the blob store (`blob_key`). Migration adds the
/// bucket copy (`gs_key`); cleanup then drops the blob reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRecord {
    /// Unique identifier, also used in the serving URL
    pub id: String,
    /// Key in the blob store
    pub blob_key: Option<String>,
    /// Key in the bucket (`/<bucket>/<filename>`)
    pub gs_key: Option<String>,
    /// Serving URL
    pub url: String,
    /// Original file name
    pub filename: String,
    /// MIME type given at upload
    pub content_type: String,
    /// Last save
    pub updated: DateTime<Utc>,
}

impl MediaRecord {
    /// A fresh record pointing at a blob.
    pub fn new(
        id: impl Into<String>,
        blob_key: impl Into<String>,
        url: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            blob_key: Some(blob_key.into()),
            gs_key: None,
            url: url.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            updated: Utc::now(),
        }
    }

    pub fn is_migrated(&self) -> bool {
        self.gs_key.is_some()
    }

    /// Wire representation.
    pub fn to_item(&self) -> MediaItem {
        MediaItem::from(self)
    }
}

// =============================================================================
// Media Item
// =============================================================================

/// Metadata sent to clients for one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub url: String,
    pub gs_key: Option<String>,
    pub blob_key: Option<String>,
    /// ISO-8601 timestamp
    pub updated: String,
}

impl From<&MediaRecord> for MediaItem {
    fn from(record: &MediaRecord) -> Self {
        Self {
            url: record.url.clone(),
            gs_key: record.gs_key.clone(),
            blob_key: record.blob_key.clone(),
            updated: record.updated.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_shape() {
        let record = MediaRecord::new("id1", "blob1", "http://h/media/id1", "cat.png", "image/png");
        let value = serde_json::to_value(record.to_item()).unwrap();

        assert_eq!(value["url"], json!("http://h/media/id1"));
        assert_eq!(value["blob_key"], json!("blob1"));
        assert_eq!(value["gs_key"], json!(null));
        assert!(value["updated"].as_str().unwrap().ends_with('Z'));
        assert!(!record.is_migrated());
    }
}
