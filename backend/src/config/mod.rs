//! Server configuration.
//!
//! Read from the environment (a `.env` file is loaded first if present):
//!
//! | Variable                     | Default                  |
//! |------------------------------|--------------------------|
//! | `IMAGEDROP_DATA_DIR`         | `.imagedrop`             |
//! | `IMAGEDROP_PUBLIC_URL`       | `http://localhost:<port>`|
//! | `IMAGEDROP_BUCKET`           | `bs2gcs`                 |
//! | `IMAGEDROP_SESSION_TTL_SECS` | `600`                    |
//! | `IMAGEDROP_MAX_UPLOAD_BYTES` | unset (no limit)         |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Directory holding blobs, bucket objects and media records.
pub const DEFAULT_DATA_DIR: &str = ".imagedrop";

/// Bucket migrated blobs are copied into.
pub const DEFAULT_BUCKET: &str = "bs2gcs";

/// Lifetime of an unused upload URL.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 600;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    /// Base URL clients reach the server at, without trailing slash.
    pub public_url: String,
    pub bucket: String,
    pub session_ttl: Duration,
    /// Body size cap of the upload route, `None` for no cap.
    pub max_upload_bytes: Option<usize>,
}

impl ServerConfig {
    /// Defaults for the given port, everything stored under `data_dir`.
    pub fn new(port: u16, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            port,
            data_dir: data_dir.into(),
            public_url: format!("http://localhost:{}", port),
            bucket: DEFAULT_BUCKET.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            max_upload_bytes: None,
        }
    }

    /// Build from the environment.
    pub fn from_env(port: u16) -> Self {
        let _ = dotenvy::dotenv();

        let data_dir = env::var("IMAGEDROP_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let mut config = Self::new(port, data_dir);

        if let Ok(url) = env::var("IMAGEDROP_PUBLIC_URL") {
            config.public_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(bucket) = env::var("IMAGEDROP_BUCKET") {
            config.bucket = bucket;
        }
        if let Some(ttl) = env::var("IMAGEDROP_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.session_ttl = Duration::from_secs(ttl);
        }
        config.max_upload_bytes = env::var("IMAGEDROP_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());
        config
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn blobs_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }

    pub fn bucket_dir(&self) -> PathBuf {
        self.data_dir.join("gcs")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.data_dir.join("media")
    }

    /// Serving URL of a media record.
    pub fn serving_url(&self, id: &str) -> String {
        format!("{}/media/{}", self.public_url, id)
    }

    /// One-time upload URL for a session token.
    pub fn upload_url(&self, token: &str) -> String {
        format!("{}/api/upload_success/{}", self.public_url, token)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_DATA_DIR)
    }
}
