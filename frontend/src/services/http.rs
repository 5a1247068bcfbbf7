//! Browser transport.
//!
//! GET goes through `gloo-net`. The upload uses a raw `XMLHttpRequest`
//! because `fetch` exposes no upload progress.

use std::rc::Rc;

use gloo_net::http::Request;
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use super::progress::{ProgressReporter, ProgressSample};
use super::upload::{HttpReply, MultipartPayload, Transport};
use crate::types::{AppError, AppResult};

/// [`Transport`] running on the browser's network stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    type File = File;

    async fn get(&self, url: &str) -> AppResult<HttpReply> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if status != 200 {
            return Ok(HttpReply::status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response: {}", e)))?;
        Ok(HttpReply { status, body })
    }

    async fn post_multipart(
        &self,
        url: &str,
        payload: &MultipartPayload<'_, File>,
        progress: Option<Rc<ProgressReporter>>,
    ) -> AppResult<HttpReply> {
        let form = FormData::new().map_err(AppError::dom)?;
        for part in payload.parts() {
            form.append_with_blob_and_filename(&part.field, part.file, &part.field)
                .map_err(AppError::dom)?;
        }

        let xhr = XmlHttpRequest::new().map_err(AppError::dom)?;
        xhr.open_with_async("POST", url, true).map_err(AppError::dom)?;

        // Held until the request settles so the handler stays alive.
        let _on_progress = match progress {
            Some(reporter) => {
                let upload = xhr.upload().map_err(AppError::dom)?;
                let handler = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
                    reporter.report(ProgressSample {
                        loaded: event.loaded(),
                        total: event.total(),
                        length_computable: event.length_computable(),
                    });
                });
                upload.set_onprogress(Some(handler.as_ref().unchecked_ref()));
                Some(handler)
            }
            None => None,
        };

        let settled = Promise::new(&mut |resolve, reject| {
            xhr.set_onload(Some(&resolve));
            xhr.set_onerror(Some(&reject));
            xhr.set_onabort(Some(&reject));
        });

        xhr.send_with_opt_form_data(Some(&form)).map_err(AppError::dom)?;
        JsFuture::from(settled)
            .await
            .map_err(|e| AppError::Network(format!("POST {} failed: {:?}", url, e)))?;

        let status = xhr.status().map_err(AppError::dom)?;
        if status != 200 {
            return Ok(HttpReply::status(status));
        }

        let body = xhr
            .response_text()
            .map_err(AppError::dom)?
            .unwrap_or_default();
        Ok(HttpReply { status, body })
    }
}
