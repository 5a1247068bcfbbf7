//! imagedrop - Frontend Rust/Leptos Application
//!
//! A WebAssembly uploader: pick images, get a one-time upload URL from the
//! backend, post the files to it and show what was stored.
//!
//! # Architecture
//!
//! ```text
//! change event ──▶ Binder ──▶ GET endpoint ──▶ POST multipart ──▶ Renderer
//!                  (data-upload-url)  { url }     (progress bar)    (list head)
//! ```
//!
//! # Modules
//!
//! - [`types`] - API types (UploadTarget, MediaItem) and errors
//! - [`components`] - Page components (Header, UploadSection, ...)
//! - [`services`] - Upload flow, transport, rendering, binding

use leptos::*;
use leptos_meta::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // API
    MediaItem, UploadTarget, RequestStep,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Start the bundled page: mount it, bind the uploader, load stored media.
pub fn boot() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 imagedrop - Starting Leptos App");

    mount_to_body(|| view! { <App/> });

    let context = match bind_uploader(&UploaderSelectors::default()) {
        Ok(context) => context,
        Err(e) => {
            log::error!("❌ Uploader setup failed: {}", e);
            return;
        }
    };

    spawn_local(async move {
        match load_existing(&BrowserTransport, &*context, &media_list_url()).await {
            Ok(count) => log::info!("🖼️  Loaded {} stored image(s)", count),
            Err(e) => log::warn!("⚠️  Could not load stored images: {}", e),
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="imagedrop"/>
        <Header/>

        <main>
            <div class="container">
                <Hero/>
                <UploadSection/>
            </div>
        </main>

        <Footer/>
    }
}
