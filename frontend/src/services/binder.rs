//! Hooks the uploader up to elements already on the page.
//!
//! ```js
//! import init, { setup } from "./imagedrop_frontend.js";
//! await init();
//! setup("#images", "#file-input", "#upload-progress");
//! ```
//!
//! The input must carry the upload-URL endpoint in `data-upload-url`.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlInputElement, HtmlProgressElement};

use super::http::BrowserTransport;
use super::progress::ProgressReporter;
use super::render::DomList;
use super::upload::{handle_selection, FileSelection, UploadContext};
use crate::config::{
    DEFAULT_INPUT_SELECTOR, DEFAULT_LIST_SELECTOR, DEFAULT_PROGRESS_SELECTOR, UPLOAD_URL_DATA_KEY,
};
use crate::types::{AppError, AppResult};

/// CSS selectors of the three elements the uploader works with.
#[derive(Clone, Debug, PartialEq)]
pub struct UploaderSelectors {
    pub list: String,
    pub input: String,
    pub progress: String,
}

impl Default for UploaderSelectors {
    fn default() -> Self {
        Self {
            list: DEFAULT_LIST_SELECTOR.to_string(),
            input: DEFAULT_INPUT_SELECTOR.to_string(),
            progress: DEFAULT_PROGRESS_SELECTOR.to_string(),
        }
    }
}

fn document() -> AppResult<Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| AppError::Dom("no document available".to_string()))
}

fn progress_reporter(document: &Document, selector: &str) -> Option<Rc<ProgressReporter>> {
    let element = document.query_selector(selector).ok().flatten()?;
    let progress = element.dyn_into::<HtmlProgressElement>().ok()?;
    Some(Rc::new(ProgressReporter::new(progress)))
}

/// Attach the change handler to the input. Fails right away when the input or
/// the list is missing. Returns the context used to render into the list.
pub fn bind_uploader(selectors: &UploaderSelectors) -> AppResult<Rc<UploadContext<DomList>>> {
    let document = document()?;

    let input: HtmlInputElement = document
        .query_selector(&selectors.input)
        .map_err(AppError::dom)?
        .ok_or_else(|| AppError::MissingElement(selectors.input.clone()))?
        .dyn_into()
        .map_err(|_| AppError::Dom(format!("{} is not an <input>", selectors.input)))?;

    let list = document
        .query_selector(&selectors.list)
        .map_err(AppError::dom)?
        .ok_or_else(|| AppError::MissingElement(selectors.list.clone()))?;

    let context = Rc::new(UploadContext::new(DomList::new(document.clone(), list)));

    let handler_context = context.clone();
    let handler_input = input.clone();
    let progress_selector = selectors.progress.clone();
    let on_change = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        let endpoint = handler_input.dataset().get(UPLOAD_URL_DATA_KEY);
        let selection = FileSelection::from_file_list(handler_input.files());
        let progress = progress_reporter(&document, &progress_selector);
        let context = handler_context.clone();

        spawn_local(async move {
            match handle_selection(&BrowserTransport, &*context, endpoint, selection, progress).await {
                Ok(_) => {}
                Err(e @ AppError::MissingEndpoint) => log::error!("❌ {}", e),
                Err(e) => log::warn!("⚠️  Upload dropped: {}", e),
            }
        });
    });

    input
        .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
        .map_err(AppError::dom)?;
    // The listener lives as long as the page
    on_change.forget();

    log::info!("📎 Uploader bound to {}", selectors.input);
    Ok(context)
}

/// JavaScript entry point: bind the uploader to the given elements.
#[wasm_bindgen]
pub fn setup(list_selector: &str, input_selector: &str, progress_selector: &str) -> Result<(), JsValue> {
    let selectors = UploaderSelectors {
        list: list_selector.to_string(),
        input: input_selector.to_string(),
        progress: progress_selector.to_string(),
    };
    bind_uploader(&selectors)
        .map(|_| ())
        .map_err(|e| js_sys::Error::new(&e.to_string()).into())
}
