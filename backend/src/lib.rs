//! # imagedrop - image uploads with one-time URLs
//!
//! Backend for the imagedrop uploader. Hands out one-time upload URLs,
//! stores uploaded files in a blob store, lists and serves them, and migrates
//! blobs into a bucket.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐ GET /api/upload_url  ┌──────────┐        ┌────────────┐
//! │ Uploader │─────────────────────▶│  Server  │───────▶│ Blob store │
//! │ (wasm)   │ POST /upload_success │  (axum)  │        └─────┬──────┘
//! └──────────┘◀──── MediaItem[] ────└────┬─────┘              │ migrate
//!                                        │ registry     ┌─────▼──────┐
//!                                        └─────────────▶│   Bucket   │
//!                                                       └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Environment configuration
//! - [`models`] - MediaRecord and its wire form MediaItem
//! - [`storage`] - Filesystem object stores
//! - [`registry`] - Persisted media records
//! - [`migration`] - Blob store to bucket migration
//! - [`client`] - Native upload client
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod config;
pub mod models;

// Persistence
pub mod storage;
pub mod registry;

// Jobs
pub mod migration;

// Client
pub mod client;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ClientError, MigrationError, RegistryError, ServerError, StorageError};

pub use config::ServerConfig;

pub use models::{MediaItem, MediaRecord};

pub use storage::{sanitize_filename, FsObjectStore};

pub use registry::MediaRegistry;

pub use migration::{cleanup, migrate, MigrationReport};

pub use client::{LocalFile, UploadClient};

pub use api::types::{error_response, UploadUrlResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
