//! Upload services.
//!
//! # Services
//!
//! - [`binder`] - Attaches the uploader to page elements (JS `setup` entry point)
//! - [`upload`] - Upload-URL fetch, multipart upload, coordination
//! - [`progress`] - Upload progress reporting
//! - [`render`] - Rendering of returned media into the list
//! - [`http`] - Browser transport (gloo-net + XMLHttpRequest)
//! - [`media`] - Listing of already stored media

pub mod binder;
pub mod http;
pub mod media;
pub mod progress;
pub mod render;
pub mod upload;

pub use binder::*;
pub use http::*;
pub use media::*;
pub use progress::*;
pub use render::*;
pub use upload::*;
