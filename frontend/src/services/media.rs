//! Listing of media already stored by the backend.

use super::render::ListContainer;
use super::upload::{Transport, UploadContext};
use crate::config::{BACKEND_URL, MEDIA_LIST_PATH};
use crate::types::{AppError, AppResult, MediaItem, RequestStep};

/// Full URL of the media listing on the bundled backend.
pub fn media_list_url() -> String {
    format!("{}{}", BACKEND_URL, MEDIA_LIST_PATH)
}

/// Fill the list with what the backend already has, newest first.
pub async fn load_existing<T: Transport, L: ListContainer>(
    transport: &T,
    context: &UploadContext<L>,
    url: &str,
) -> AppResult<usize> {
    let reply = transport.get(url).await?;
    if reply.status != 200 {
        return Err(AppError::Status { step: RequestStep::ListMedia, status: reply.status });
    }
    let items = MediaItem::list_from_json(&reply.body)?;
    context.render_existing(&items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::render::tests::{item, MemoryList};
    use crate::services::upload::tests::{Call, FakeTransport};
    use crate::services::upload::HttpReply;
    use futures::executor::block_on;

    #[test]
    fn test_existing_media_is_appended() {
        let body = serde_json::to_string(&vec![item("newest"), item("oldest")]).unwrap();
        let transport = FakeTransport::new(HttpReply::ok(body), HttpReply::status(500));
        let context = UploadContext::new(MemoryList::default());

        let count = block_on(load_existing(&transport, &context, "/api/media")).unwrap();

        assert_eq!(count, 2);
        assert_eq!(context.list().snapshot(), vec!["newest", "oldest"]);
        assert_eq!(*transport.calls.borrow(), vec![Call::Get("/api/media".into())]);
    }

    #[test]
    fn test_listing_failure_renders_nothing() {
        let transport = FakeTransport::new(HttpReply::status(503), HttpReply::status(500));
        let context = UploadContext::new(MemoryList::default());

        let result = block_on(load_existing(&transport, &context, "/api/media"));

        assert_eq!(result, Err(AppError::Status { step: RequestStep::ListMedia, status: 503 }));
        assert!(context.list().snapshot().is_empty());
    }
}
