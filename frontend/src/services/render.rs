//! Result rendering: turns media items into list entries.
//!
//! Freshly uploaded items are inserted at the head of the list, one after the
//! other in response order, so `[A, B]` ends up as `B, A, <older entries>`.
//! Items loaded at startup are appended instead, keeping the server's order.

use web_sys::{Document, Element};

use crate::config::THUMBNAIL_SUFFIX;
use crate::types::{AppError, AppResult, MediaItem};

/// Content of one list entry, ready to be turned into DOM nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaFragment {
    pub thumbnail_src: String,
    pub href: String,
    pub gs_key: String,
    pub blob_key: String,
    pub updated: String,
}

impl From<&MediaItem> for MediaFragment {
    fn from(item: &MediaItem) -> Self {
        Self {
            thumbnail_src: format!("{}{}", item.url, THUMBNAIL_SUFFIX),
            href: item.url.clone(),
            gs_key: item.gs_key.clone().unwrap_or_else(|| "none".to_string()),
            blob_key: item.blob_key.clone().unwrap_or_else(|| "none".to_string()),
            updated: item.updated.clone(),
        }
    }
}

/// The list that receives rendered media.
pub trait ListContainer {
    /// Insert before the current first child.
    fn prepend(&self, fragment: &MediaFragment) -> AppResult<()>;
    /// Insert after the current last child.
    fn append(&self, fragment: &MediaFragment) -> AppResult<()>;
}

/// Render freshly uploaded items at the head of the list.
pub fn prepend_items<L: ListContainer>(list: &L, items: &[MediaItem]) -> AppResult<usize> {
    for item in items {
        list.prepend(&MediaFragment::from(item))?;
    }
    Ok(items.len())
}

/// Render already stored items at the tail of the list.
pub fn append_items<L: ListContainer>(list: &L, items: &[MediaItem]) -> AppResult<usize> {
    for item in items {
        list.append(&MediaFragment::from(item))?;
    }
    Ok(items.len())
}

/// A list container backed by a live DOM element.
pub struct DomList {
    document: Document,
    container: Element,
}

impl DomList {
    pub fn new(document: Document, container: Element) -> Self {
        Self { document, container }
    }

    fn element(&self, tag: &str, class: Option<&str>) -> AppResult<Element> {
        let el = self.document.create_element(tag).map_err(AppError::dom)?;
        if let Some(class) = class {
            el.set_class_name(class);
        }
        Ok(el)
    }

    /// Build `div.media > (div.img > img) + div.body`. Text goes through text
    /// nodes, never through `innerHTML`.
    fn build(&self, fragment: &MediaFragment) -> AppResult<Element> {
        let media = self.element("div", Some("media"))?;

        let img_box = self.element("div", Some("img"))?;
        let img = self.element("img", None)?;
        img.set_attribute("src", &fragment.thumbnail_src).map_err(AppError::dom)?;
        img_box.append_with_node_1(&img).map_err(AppError::dom)?;

        let body = self.element("div", Some("body"))?;
        let link = self.element("a", None)?;
        link.set_attribute("href", &fragment.href).map_err(AppError::dom)?;
        link.set_text_content(Some(&fragment.href));
        let updated = self.element("p", None)?;
        updated.set_text_content(Some(&format!("Updated: {}", fragment.updated)));

        body.append_with_str_1("URL: ").map_err(AppError::dom)?;
        body.append_with_node_1(&link).map_err(AppError::dom)?;
        body.append_with_node_1(&*self.element("br", None)?).map_err(AppError::dom)?;
        body.append_with_str_1(&format!("GCS key: {}", fragment.gs_key)).map_err(AppError::dom)?;
        body.append_with_node_1(&*self.element("br", None)?).map_err(AppError::dom)?;
        body.append_with_str_1(&format!("Blob key: {}", fragment.blob_key)).map_err(AppError::dom)?;
        body.append_with_node_1(&updated).map_err(AppError::dom)?;

        media.append_with_node_1(&img_box).map_err(AppError::dom)?;
        media.append_with_node_1(&body).map_err(AppError::dom)?;
        Ok(media)
    }
}

impl ListContainer for DomList {
    fn prepend(&self, fragment: &MediaFragment) -> AppResult<()> {
        let node = self.build(fragment)?;
        let first = self.container.first_child();
        self.container
            .insert_before(&node, first.as_ref())
            .map_err(AppError::dom)?;
        Ok(())
    }

    fn append(&self, fragment: &MediaFragment) -> AppResult<()> {
        let node = self.build(fragment)?;
        self.container.append_child(&node).map_err(AppError::dom)?;
        Ok(())
    }
}
