// SPDX-License-Identifier: MPL-2.0
//! Rendered gallery items and lazy thumbnail loading.
//!
//! Items are appended in backend order and start with a placeholder. A
//! thumbnail is requested the first time its cell intersects the viewport and
//! never again afterwards, whatever the outcome. Decoded thumbnails are kept
//! in an LRU cache keyed by URL so a reset listing reuses them.

use crate::application::port::HostError;
use crate::domain::gallery::ImageDescriptor;
use crate::sync::paginator::ScrollMetrics;
use iced::widget::image;
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::ops::Range;

#[derive(Debug, Clone)]
pub enum ThumbnailSlot {
    /// Not yet visible.
    Placeholder,
    /// Requested, waiting for bytes.
    Loading,
    Ready(image::Handle),
    /// The fetch failed. The item keeps its placeholder for good.
    Failed,
}

#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub descriptor: ImageDescriptor,
    pub thumbnail: ThumbnailSlot,
}

/// Geometry of the thumbnail grid, used to work out which cells are visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    /// Height of one cell (thumbnail plus checkbox row).
    pub row_height: f32,
    /// Vertical gap between rows.
    pub spacing: f32,
    /// Padding above the first row.
    pub padding: f32,
}

impl GridLayout {
    fn row_pitch(&self) -> f32 {
        (self.row_height + self.spacing).max(1.0)
    }

    /// Total height of a grid holding `len` items.
    #[must_use]
    pub fn content_height(&self, len: usize) -> f32 {
        let rows = len.div_ceil(self.columns.max(1));
        if rows == 0 {
            return 2.0 * self.padding;
        }
        2.0 * self.padding + rows as f32 * self.row_height + (rows - 1) as f32 * self.spacing
    }

    /// Indices of the items whose cells intersect the viewport.
    #[must_use]
    pub fn visible_range(&self, metrics: &ScrollMetrics, len: usize) -> Range<usize> {
        let columns = self.columns.max(1);
        if len == 0 || metrics.viewport_height <= 0.0 {
            return 0..0;
        }

        let top = (metrics.offset_y - self.padding).max(0.0);
        let bottom = metrics.offset_y + metrics.viewport_height - self.padding;
        if bottom <= 0.0 {
            return 0..0;
        }

        let first_row = (top / self.row_pitch()).floor() as usize;
        let last_row = ((bottom / self.row_pitch()).ceil() as usize).saturating_sub(1);

        let start = (first_row * columns).min(len);
        let end = ((last_row + 1) * columns).min(len);
        start..end
    }
}

#[derive(Debug)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    cache: LruCache<String, image::Handle>,
}

impl Gallery {
    pub fn new(cache_size: NonZeroUsize) -> Self {
        Self {
            items: Vec::new(),
            cache: LruCache::new(cache_size),
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    /// Original URLs of the rendered items, in display order.
    pub fn originals(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .map(|item| item.descriptor.original.as_str())
    }

    /// Appends a page of descriptors. Cached thumbnails show up immediately.
    pub fn append(&mut self, descriptors: Vec<ImageDescriptor>) {
        self.items.reserve(descriptors.len());
        for descriptor in descriptors {
            let thumbnail = match self.cache.get(&descriptor.thumbnail) {
                Some(handle) => ThumbnailSlot::Ready(handle.clone()),
                None => ThumbnailSlot::Placeholder,
            };
            self.items.push(GalleryItem {
                descriptor,
                thumbnail,
            });
        }
    }

    /// Drops every rendered item. The thumbnail cache is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Marks the placeholders in `range` as loading and returns the distinct
    /// thumbnail URLs to fetch.
    pub fn request_thumbnails(&mut self, range: Range<usize>) -> Vec<String> {
        let end = range.end.min(self.items.len());
        let start = range.start.min(end);
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for item in &mut self.items[start..end] {
            if !matches!(item.thumbnail, ThumbnailSlot::Placeholder) {
                continue;
            }
            item.thumbnail = ThumbnailSlot::Loading;
            if seen.insert(item.descriptor.thumbnail.clone()) {
                urls.push(item.descriptor.thumbnail.clone());
            }
        }
        urls
    }

    /// Stores a fetched thumbnail for every item waiting on `url`.
    pub fn thumbnail_loaded(&mut self, url: &str, result: Result<Vec<u8>, HostError>) {
        let slot = match result {
            Ok(bytes) => {
                let handle = image::Handle::from_bytes(bytes);
                self.cache.put(url.to_string(), handle.clone());
                ThumbnailSlot::Ready(handle)
            }
            Err(err) => {
                tracing::warn!(%url, %err, "thumbnail unavailable");
                ThumbnailSlot::Failed
            }
        };

        for item in self
            .items
            .iter_mut()
            .filter(|item| item.descriptor.thumbnail == url)
        {
            if matches!(item.thumbnail, ThumbnailSlot::Loading) {
                item.thumbnail = slot.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout {
            columns: 4,
            row_height: 200.0,
            spacing: 0.0,
            padding: 0.0,
        }
    }

    fn descriptors(range: Range<usize>) -> Vec<ImageDescriptor> {
        range
            .map(|i| ImageDescriptor::from_url(format!("https://cdn.test/{i}.jpg")))
            .collect()
    }

    fn gallery_with(count: usize) -> Gallery {
        let mut gallery = Gallery::new(NonZeroUsize::new(16).expect("non-zero"));
        gallery.append(descriptors(0..count));
        gallery
    }

    #[test]
    fn visible_range_covers_intersecting_rows() {
        let metrics = ScrollMetrics {
            offset_y: 250.0,
            viewport_height: 300.0,
            content_height: 2_000.0,
        };
        // Rows 1 and 2 intersect [250, 550].
        assert_eq!(layout().visible_range(&metrics, 40), 4..12);
    }

    #[test]
    fn visible_range_is_clamped_to_item_count() {
        let metrics = ScrollMetrics {
            offset_y: 0.0,
            viewport_height: 10_000.0,
            content_height: 10_000.0,
        };
        assert_eq!(layout().visible_range(&metrics, 6), 0..6);
        assert_eq!(layout().visible_range(&metrics, 0), 0..0);
    }

    #[test]
    fn content_height_counts_partial_rows() {
        let grid = GridLayout {
            spacing: 10.0,
            padding: 5.0,
            ..layout()
        };
        assert!((grid.content_height(5) - (10.0 + 400.0 + 10.0)).abs() < f32::EPSILON);
        assert!((grid.content_height(0) - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn appended_items_start_as_placeholders() {
        let gallery = gallery_with(3);
        assert_eq!(gallery.len(), 3);
        assert!(gallery
            .items()
            .iter()
            .all(|item| matches!(item.thumbnail, ThumbnailSlot::Placeholder)));
    }

    #[test]
    fn thumbnails_are_requested_once() {
        let mut gallery = gallery_with(8);

        let first = gallery.request_thumbnails(0..4);
        let second = gallery.request_thumbnails(0..6);

        assert_eq!(first.len(), 4);
        assert_eq!(
            second,
            vec![
                "https://cdn.test/4.jpg".to_string(),
                "https://cdn.test/5.jpg".to_string()
            ]
        );
    }

    #[test]
    fn failed_thumbnail_is_not_requested_again() {
        let mut gallery = gallery_with(1);
        let urls = gallery.request_thumbnails(0..1);
        gallery.thumbnail_loaded(&urls[0], Err(HostError::Status(404)));

        assert!(matches!(
            gallery.get(0).map(|item| &item.thumbnail),
            Some(ThumbnailSlot::Failed)
        ));
        assert!(gallery.request_thumbnails(0..1).is_empty());
    }

    #[test]
    fn loaded_thumbnail_is_cached_across_clear() {
        let mut gallery = gallery_with(2);
        let urls = gallery.request_thumbnails(0..2);
        gallery.thumbnail_loaded(&urls[0], Ok(vec![1, 2, 3]));

        gallery.clear();
        gallery.append(descriptors(0..2));

        assert!(matches!(
            gallery.get(0).map(|item| &item.thumbnail),
            Some(ThumbnailSlot::Ready(_))
        ));
        assert!(matches!(
            gallery.get(1).map(|item| &item.thumbnail),
            Some(ThumbnailSlot::Placeholder)
        ));
    }

    #[test]
    fn late_thumbnail_for_cleared_item_is_ignored() {
        let mut gallery = gallery_with(1);
        let urls = gallery.request_thumbnails(0..1);
        gallery.clear();

        gallery.thumbnail_loaded(&urls[0], Ok(vec![0]));

        assert!(gallery.is_empty());
    }

    #[test]
    fn out_of_bounds_request_is_empty() {
        let mut gallery = gallery_with(2);
        assert!(gallery.request_thumbnails(5..9).is_empty());
    }
}
