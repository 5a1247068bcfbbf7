//! HTTP Server for the imagedrop API.
//!
//! # API Endpoints
//!
//! | Method | Path                          | Description                          |
//! |--------|-------------------------------|--------------------------------------|
//! | GET    | `/health`                     | Health check                         |
//! | GET    | `/api/upload_url`             | One-time upload URL                  |
//! | POST   | `/api/upload_success/{token}` | Multipart upload, returns media items|
//! | GET    | `/api/media`                  | Stored media, newest first           |
//! | GET    | `/media/{id}`                 | Image bytes (`=s…` suffix ignored)   |
//! | GET    | `/api/logs`                   | SSE stream for real-time logs        |

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::logs::{log_error, log_info, log_success, LOG_BROADCASTER};
use super::sessions::UploadSessions;
use super::types::{error_response, MediaItem, UploadUrlResponse};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult, StorageError};
use crate::models::MediaRecord;
use crate::registry::{MediaRegistry, MAX_LISTED};
use crate::storage::{sanitize_filename, FsObjectStore};

/// Content type used when the client sends none
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

type Rejection = (StatusCode, Json<Value>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, Json(error_response(message)))
}

/// Map a server error to its HTTP answer
fn rejection(err: ServerError) -> Rejection {
    let status = match &err {
        ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Registry(_) | ServerError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    reject(status, &err.to_string())
}

/// Shared state of the server
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<UploadSessions>,
    pub registry: Arc<Mutex<MediaRegistry>>,
    pub blobs: FsObjectStore,
    pub bucket: FsObjectStore,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            sessions: Arc::new(UploadSessions::new(config.session_ttl)),
            registry: Arc::new(Mutex::new(MediaRegistry::open(config.media_dir()))),
            blobs: FsObjectStore::new(config.blobs_dir()),
            bucket: FsObjectStore::new(config.bucket_dir()),
            config: Arc::new(config),
        }
    }

    fn registry(&self) -> ServerResult<MutexGuard<'_, MediaRegistry>> {
        self.registry
            .lock()
            .map_err(|_| ServerError::Internal("media registry lock poisoned".into()))
    }

    /// Open an upload session and return its URL
    pub fn issue_upload_url(&self) -> String {
        let token = self.sessions.issue();
        self.config.upload_url(&token)
    }

    /// Store one uploaded file and register it
    pub fn ingest(
        &self,
        field_name: &str,
        file_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> ServerResult<MediaItem> {
        let id = Uuid::new_v4().simple().to_string();
        let blob_key = Uuid::new_v4().simple().to_string();
        self.blobs.put(&blob_key, data)?;

        let record = MediaRecord::new(
            id.clone(),
            blob_key,
            self.config.serving_url(&id),
            sanitize_filename(file_name.unwrap_or(field_name)),
            content_type.unwrap_or(FALLBACK_CONTENT_TYPE),
        );
        let saved = self.registry()?.save(record)?;
        Ok(saved.to_item())
    }

    /// Newest media first
    pub fn recent_media(&self) -> ServerResult<Vec<MediaItem>> {
        let registry = self.registry()?;
        Ok(registry
            .list_recent(MAX_LISTED)
            .into_iter()
            .map(MediaItem::from)
            .collect())
    }

    /// Content type and bytes of a record. `key` may carry a size suffix
    /// (`<id>=s100-c`), which is ignored.
    pub fn load_media(&self, key: &str) -> ServerResult<(String, Vec<u8>)> {
        let id = key.split('=').next().unwrap_or(key);
        let record = self.registry()?.require(id)?.clone();

        if let Some(gs_key) = record.gs_key.as_deref() {
            if self.bucket.exists(gs_key) {
                return Ok((record.content_type, self.bucket.get(gs_key)?));
            }
        }
        match record.blob_key.as_deref() {
            Some(blob_key) => Ok((record.content_type, self.blobs.get(blob_key)?)),
            None => Err(StorageError::NotFound(record.id).into()),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    // Permissive CORS so the frontend can be served from elsewhere
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    // Uploads are not size-checked unless a cap is configured
    let upload_limit = match state.config.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload_url", get(get_upload_url))
        .route("/api/upload_success/{token}", post(upload_success).layer(upload_limit))
        .route("/api/media", get(list_media))
        .route("/media/{key}", get(serve_media))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let port = config.port;
    let state = AppState::new(config);
    let stored = state.registry()?.len();
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 imagedrop server running on http://localhost:{}", port);
    println!("   GET  /api/upload_url           - One-time upload URL");
    println!("   POST /api/upload_success/{{t}}   - Multipart upload");
    println!("   GET  /api/media                - Stored media");
    println!("   GET  /api/logs                 - SSE log stream");
    println!("   GET  /health                   - Health check");
    println!();
    println!("🖼️  {} media record(s) loaded", stored);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "imagedrop",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "uploadUrl": "GET /api/upload_url",
            "upload": "POST /api/upload_success/{token}",
            "media": "GET /api/media",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// One-time upload URL endpoint
async fn get_upload_url(State(state): State<AppState>) -> Json<UploadUrlResponse> {
    let url = state.issue_upload_url();
    log_info("Upload URL issued");
    Json(UploadUrlResponse { url })
}

/// Upload endpoint: every multipart field is a file
async fn upload_success(
    State(state): State<AppState>,
    Path(token): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Vec<MediaItem>>, Rejection> {
    if !state.sessions.consume(&token) {
        return Err(reject(StatusCode::NOT_FOUND, "Unknown or expired upload URL"));
    }

    let mut items = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejection(ServerError::BadRequest(format!("Multipart error: {}", e))))?
    {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let data: Bytes = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                log_error(format!("Read error on field '{}': {}", name, e));
                continue;
            }
        };

        match state.ingest(&name, file_name.as_deref(), content_type.as_deref(), &data) {
            Ok(item) => {
                log_success(format!("Stored '{}' ({} bytes)", file_name.as_deref().unwrap_or(&name), data.len()));
                items.push(item);
            }
            Err(e) => log_error(format!("Failed to store '{}': {}", name, e)),
        }
    }

    Ok(Json(items))
}

/// Stored media listing
async fn list_media(State(state): State<AppState>) -> Result<Json<Vec<MediaItem>>, Rejection> {
    state
        .recent_media()
        .map(Json)
        .map_err(rejection)
}

/// Image bytes
async fn serve_media(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let (content_type, data) = state.load_media(&key).map_err(rejection)?;
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn state(dir: &std::path::Path) -> AppState {
        AppState::new(ServerConfig::new(3000, dir))
    }

    #[test]
    fn test_ingest_then_list_newest_first() {
        let dir = tempdir().unwrap();
        let state = state(dir.path());

        let first = state.ingest("a.png", Some("a.png"), Some("image/png"), b"aaa").unwrap();
        std::thread::sleep(Duration::from_millis(2));
        let second = state.ingest("b.png", None, None, b"bbb").unwrap();

        assert!(first.url.starts_with("http://localhost:3000/media/"));
        assert!(first.blob_key.is_some());
        assert_eq!(first.gs_key, None);

        let listed = state.recent_media().unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn test_load_media_accepts_size_suffix() {
        let dir = tempdir().unwrap();
        let state = state(dir.path());
        let item = state.ingest("cat.png", Some("cat.png"), Some("image/png"), b"meow").unwrap();
        let id = item.url.rsplit('/').next().unwrap();

        let (content_type, data) = state.load_media(&format!("{}=s100-c", id)).unwrap();
        assert_eq!(content_type, "image/png");
        assert_eq!(data, b"meow");

        assert!(matches!(state.load_media("missing"), Err(ServerError::Registry(_))));
    }

    #[test]
    fn test_load_media_prefers_bucket_copy() {
        let dir = tempdir().unwrap();
        let state = state(dir.path());
        let item = state.ingest("cat.png", Some("cat.png"), Some("image/png"), b"blob").unwrap();
        let id = item.url.rsplit('/').next().unwrap().to_string();

        {
            let mut registry = state.registry.lock().unwrap();
            let mut record = registry.get(&id).unwrap().clone();
            record.gs_key = Some("/bs2gcs/cat.png".into());
            record.blob_key = None;
            registry.save(record).unwrap();
        }
        state.bucket.put("/bs2gcs/cat.png", b"bucket").unwrap();

        let (_, data) = state.load_media(&id).unwrap();
        assert_eq!(data, b"bucket");
    }

    #[test]
    fn test_upload_url_is_single_use() {
        let dir = tempdir().unwrap();
        let state = state(dir.path());

        let url = state.issue_upload_url();
        let token = url.rsplit('/').next().unwrap();
        assert!(url.starts_with("http://localhost:3000/api/upload_success/"));
        assert!(state.sessions.consume(token));
        assert!(!state.sessions.consume(token));
    }

    #[test]
    fn test_rejection_status() {
        assert_eq!(rejection(ServerError::BadRequest("x".into())).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            rejection(ServerError::Registry(crate::error::RegistryError::NotFound("x".into()))).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(rejection(ServerError::Internal("x".into())).0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    // =========================================================================
    // Served router
    // =========================================================================

    /// Serve the router on an ephemeral port. Returns the base URL.
    async fn serve(dir: &std::path::Path, max_upload_bytes: Option<usize>) -> (String, AppState) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let mut config = ServerConfig::new(3000, dir);
        config.public_url = base.clone();
        config.max_upload_bytes = max_upload_bytes;
        let state = AppState::new(config);

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (base, state)
    }

    async fn upload_url(client: &reqwest::Client, base: &str) -> String {
        let target: UploadUrlResponse = client
            .get(format!("{}/api/upload_url", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        target.url
    }

    fn form(files: &[(&str, Vec<u8>)]) -> reqwest::multipart::Form {
        files.iter().fold(reqwest::multipart::Form::new(), |form, (name, data)| {
            let part = reqwest::multipart::Part::bytes(data.clone())
                .file_name(name.to_string())
                .mime_str("image/png")
                .unwrap();
            form.part(name.to_string(), part)
        })
    }

    #[tokio::test]
    async fn test_upload_larger_than_default_body_limit() {
        let dir = tempdir().unwrap();
        let (base, _state) = serve(dir.path(), None).await;
        let client = reqwest::Client::new();
        let big: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

        let url = upload_url(&client, &base).await;
        let response = client.post(&url).multipart(form(&[("photo.jpg", big.clone())])).send().await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let items: Vec<MediaItem> = response.json().await.unwrap();
        assert_eq!(items.len(), 1);

        let served = client.get(&items[0].url).send().await.unwrap().bytes().await.unwrap();
        assert_eq!(served.len(), big.len());
    }

    #[tokio::test]
    async fn test_configured_upload_cap_is_enforced() {
        let dir = tempdir().unwrap();
        let (base, state) = serve(dir.path(), Some(1024)).await;
        let client = reqwest::Client::new();

        let url = upload_url(&client, &base).await;
        let response = client.post(&url).multipart(form(&[("a.png", vec![0u8; 4096])])).send().await.unwrap();

        if response.status() == reqwest::StatusCode::OK {
            let items: Vec<MediaItem> = response.json().await.unwrap();
            assert!(items.is_empty());
        }
        assert!(state.recent_media().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_url_cannot_be_reused() {
        let dir = tempdir().unwrap();
        let (base, _state) = serve(dir.path(), None).await;
        let client = reqwest::Client::new();

        let url = upload_url(&client, &base).await;
        let first = client.post(&url).multipart(form(&[("a.png", b"a".to_vec())])).send().await.unwrap();
        let second = client.post(&url).multipart(form(&[("a.png", b"a".to_vec())])).send().await.unwrap();
        let unknown = client
            .post(format!("{}/api/upload_success/nope", base))
            .multipart(form(&[("a.png", b"a".to_vec())]))
            .send()
            .await
            .unwrap();

        assert_eq!(first.status(), reqwest::StatusCode::OK);
        assert_eq!(second.status(), reqwest::StatusCode::NOT_FOUND);
        assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_items_follow_field_order_and_serve_thumbnails() {
        let dir = tempdir().unwrap();
        let (base, _state) = serve(dir.path(), None).await;
        let client = reqwest::Client::new();

        let url = upload_url(&client, &base).await;
        let items: Vec<MediaItem> = client
            .post(&url)
            .multipart(form(&[("zebra.png", b"zebra".to_vec()), ("apple.png", b"apple".to_vec())]))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        for (item, expected) in items.iter().zip([&b"zebra"[..], &b"apple"[..]]) {
            let response = client.get(format!("{}=s100-c", item.url)).send().await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::OK);
            assert_eq!(
                response.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap(),
                "image/png"
            );
            assert_eq!(&response.bytes().await.unwrap()[..], expected);
        }

        let missing = client.get(format!("{}/media/unknown=s100-c", base)).send().await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
