//! HTTP API module.
//!
//! Server, API types, upload sessions and the log stream.

pub mod server;
pub mod types;
pub mod logs;
pub mod sessions;

pub use server::{router, start_server, AppState};
pub use types::*;
pub use logs::*;
pub use sessions::UploadSessions;
