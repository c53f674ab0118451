use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared request flag for scrolling to the newest row.
///
/// Cloned into store observers so the store can ask for a scroll without
/// holding on to the view.
#[derive(Debug, Clone)]
pub struct ScrollAnchor(Arc<AtomicBool>);

impl ScrollAnchor {
    fn new(pending: bool) -> Self {
        Self(Arc::new(AtomicBool::new(pending)))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Vertical scroll position of the message list, measured in rows from the top.
///
/// The position is only resolved during layout: [`ScrollManager::set_extent`]
/// updates the maximum offset and, if a scroll-to-bottom was requested since
/// the last layout, moves the offset to it.
#[derive(Debug)]
pub struct ScrollManager {
    anchor: ScrollAnchor,
    offset: usize,
    max_offset: usize,
    viewport: usize,
}

impl ScrollManager {
    /// Starts anchored to the bottom, so the first layout shows the newest row.
    pub fn new() -> Self {
        Self {
            anchor: ScrollAnchor::new(true),
            offset: 0,
            max_offset: 0,
            viewport: 0,
        }
    }

    pub fn anchor(&self) -> ScrollAnchor {
        self.anchor.clone()
    }

    pub fn request_scroll_to_bottom(&self) {
        self.anchor.request();
    }

    /// Applies a new layout and returns the resolved offset.
    pub fn set_extent(&mut self, content_height: usize, viewport_height: usize) -> usize {
        self.viewport = viewport_height;
        self.max_offset = content_height.saturating_sub(viewport_height);

        if self.anchor.take() {
            self.offset = self.max_offset;
        } else {
            self.offset = self.offset.min(self.max_offset);
        }

        self.offset
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset);
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport.max(1));
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn max_offset(&self) -> usize {
        self.max_offset
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset == self.max_offset
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}
