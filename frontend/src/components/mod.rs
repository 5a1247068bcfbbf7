//! UI components for the imagedrop page.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - File input, progress bar and media list

mod header;
mod hero;
mod upload;
mod footer;

pub use header::*;
pub use hero::*;
pub use upload::*;
pub use footer::*;
