//! Error types for the imagedrop backend.
//!
//! - [`StorageError`] - Object store errors
//! - [`RegistryError`] - Media registry errors
//! - [`MigrationError`] - Blob store to bucket migration errors
//! - [`ClientError`] - Native upload client errors
//! - [`ServerError`] - Top-level server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from a filesystem object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object does not exist.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Key would escape the store root.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// IO error.
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors from the media registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Record not found.
    #[error("Media record not found: {0}")]
    NotFound(String),

    /// IO error.
    #[error("Registry IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Registry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Migration Errors
// =============================================================================

/// Errors while moving a record from the blob store to the bucket.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Object store failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Registry failure.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

// =============================================================================
// Client Errors
// =============================================================================

/// Errors from the native upload client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not read a local file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-200 answer.
    #[error("Server answered {status} while {step}")]
    Status { step: &'static str, status: u16 },

    /// Unexpected response body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Registry failure.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for migration operations.
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
