//! Native upload client.
//!
//! Runs the same two requests as the browser uploader: GET the upload-URL
//! endpoint, then POST every file as one multipart form to the URL it returns.
//!
//! ```rust,ignore
//! use imagedrop::client::UploadClient;
//!
//! let client = UploadClient::new("http://localhost:3000/api/upload_url");
//! let items = client.upload_paths(&["cat.png".into()]).await?;
//! ```

use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

use crate::api::types::{MediaItem, UploadUrlResponse};
use crate::error::{ClientError, ClientResult};
use crate::storage::sanitize_filename;

/// A file ready to be sent
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl LocalFile {
    /// Read a file from disk, named after its last path segment
    pub fn read(path: &Path) -> ClientResult<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(sanitize_filename)
            .unwrap_or_else(|| "unnamed".to_string());
        Ok(Self { name, data })
    }
}

/// Client for one upload-URL endpoint
#[derive(Clone)]
pub struct UploadClient {
    endpoint: String,
    http: reqwest::Client,
}

impl UploadClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Ask the endpoint for a one-time destination
    pub async fn fetch_upload_url(&self) -> ClientResult<String> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(ClientError::Status { step: "fetching upload URL", status: status.as_u16() });
        }

        let target: UploadUrlResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        if target.url.trim().is_empty() {
            return Err(ClientError::InvalidResponse("empty upload URL".into()));
        }
        Ok(target.url)
    }

    /// Post files to a destination, one part per file keyed by its name
    pub async fn upload_files(&self, url: &str, files: Vec<LocalFile>) -> ClientResult<Vec<MediaItem>> {
        let form = build_form(files);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(ClientError::Status { step: "uploading files", status: status.as_u16() });
        }

        response
            .json::<Vec<MediaItem>>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Read local files and run the whole upload
    pub async fn upload_paths(&self, paths: &[PathBuf]) -> ClientResult<Vec<MediaItem>> {
        let files = paths.iter().map(|p| LocalFile::read(p)).collect::<ClientResult<Vec<_>>>()?;
        let url = self.fetch_upload_url().await?;
        self.upload_files(&url, files).await
    }
}

fn build_form(files: Vec<LocalFile>) -> Form {
    files.into_iter().fold(Form::new(), |form, file| {
        let part = Part::bytes(file.data).file_name(file.name.clone());
        form.part(file.name, part)
    })
}
