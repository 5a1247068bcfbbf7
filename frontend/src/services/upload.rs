//! Upload coordination: fetch a one-time destination, post the files to it,
//! render what comes back.
//!
//! Network access goes through the [`Transport`] trait so the sequence can run
//! against the browser (see [`crate::services::http`]) or a test double.

use std::rc::Rc;

use web_sys::{File, FileList};

use super::progress::ProgressReporter;
use super::render::{append_items, prepend_items, ListContainer};
use crate::types::{AppError, AppResult, MediaItem, RequestStep, UploadTarget};

// =============================================================================
// Files
// =============================================================================

/// A file that can be put in a multipart payload.
pub trait UploadFile {
    fn file_name(&self) -> String;
}

impl UploadFile for File {
    fn file_name(&self) -> String {
        self.name()
    }
}

/// Files picked in one change event. Fixed once captured.
#[derive(Clone, Debug)]
pub struct FileSelection<F> {
    files: Vec<F>,
}

impl<F> FileSelection<F> {
    pub fn new(files: Vec<F>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &F> {
        self.files.iter()
    }
}

impl FileSelection<File> {
    /// Capture the current content of an input's `files`.
    pub fn from_file_list(list: Option<FileList>) -> Self {
        let files = list
            .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
            .unwrap_or_default();
        Self::new(files)
    }
}

/// One part of the multipart body: field name and file content.
#[derive(Debug)]
pub struct FilePart<'a, F> {
    pub field: String,
    pub file: &'a F,
}

/// Multipart body of the upload, one part per selected file keyed by its name.
#[derive(Debug)]
pub struct MultipartPayload<'a, F> {
    parts: Vec<FilePart<'a, F>>,
}

impl<'a, F: UploadFile> MultipartPayload<'a, F> {
    pub fn from_selection(selection: &'a FileSelection<F>) -> Self {
        let parts = selection
            .iter()
            .map(|file| FilePart {
                field: file.file_name(),
                file,
            })
            .collect();
        Self { parts }
    }

    pub fn parts(&self) -> &[FilePart<'a, F>] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Status and body of a completed request. The body is only read on 200.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: String::new() }
    }

    fn expect_ok(&self, step: RequestStep) -> AppResult<()> {
        if self.status == 200 {
            Ok(())
        } else {
            Err(AppError::Status { step, status: self.status })
        }
    }
}

/// The two requests an upload needs.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type File: UploadFile;

    async fn get(&self, url: &str) -> AppResult<HttpReply>;

    async fn post_multipart(
        &self,
        url: &str,
        payload: &MultipartPayload<'_, Self::File>,
        progress: Option<Rc<ProgressReporter>>,
    ) -> AppResult<HttpReply>;
}

// =============================================================================
// Coordinator
// =============================================================================

/// State shared by every upload triggered from one binding.
pub struct UploadContext<L> {
    list: L,
}

impl<L: ListContainer> UploadContext<L> {
    pub fn new(list: L) -> Self {
        Self { list }
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    /// Put freshly uploaded items at the head of the list.
    pub fn render_uploaded(&self, items: &[MediaItem]) -> AppResult<usize> {
        prepend_items(&self.list, items)
    }

    /// Put already stored items at the tail of the list.
    pub fn render_existing(&self, items: &[MediaItem]) -> AppResult<usize> {
        append_items(&self.list, items)
    }
}

/// Check the endpoint configured on the input.
pub fn resolve_endpoint(configured: Option<String>) -> AppResult<String> {
    match configured {
        Some(endpoint) if !endpoint.is_empty() => Ok(endpoint),
        _ => Err(AppError::MissingEndpoint),
    }
}

/// GET the endpoint and read the destination URL from it.
pub async fn fetch_upload_target<T: Transport>(transport: &T, endpoint: &str) -> AppResult<UploadTarget> {
    log::debug!("🔗 Requesting upload URL from {}", endpoint);
    let reply = transport.get(endpoint).await?;
    reply.expect_ok(RequestStep::FetchTarget)?;
    UploadTarget::from_json(&reply.body)
}

/// POST the selection to the destination and read back the stored items.
pub async fn upload_files<T: Transport>(
    transport: &T,
    target: &UploadTarget,
    selection: &FileSelection<T::File>,
    progress: Option<Rc<ProgressReporter>>,
) -> AppResult<Vec<MediaItem>> {
    let payload = MultipartPayload::from_selection(selection);
    log::info!("📤 Uploading {} file(s)", payload.len());
    let reply = transport.post_multipart(&target.url, &payload, progress).await?;
    reply.expect_ok(RequestStep::Upload)?;
    MediaItem::list_from_json(&reply.body)
}

/// Full upload action for one change event. Returns the number of rendered
/// items. The endpoint is checked before anything goes on the wire; any error
/// leaves the list untouched.
pub async fn handle_selection<T: Transport, L: ListContainer>(
    transport: &T,
    context: &UploadContext<L>,
    configured_endpoint: Option<String>,
    selection: FileSelection<T::File>,
    progress: Option<Rc<ProgressReporter>>,
) -> AppResult<usize> {
    let endpoint = resolve_endpoint(configured_endpoint)?;
    let target = fetch_upload_target(transport, &endpoint).await?;
    let items = upload_files(transport, &target, &selection, progress).await?;
    let rendered = context.render_uploaded(&items)?;
    log::info!("✅ Upload complete, {} item(s) added", rendered);
    Ok(rendered)
}
