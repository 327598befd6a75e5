//! Pagination and virtualized windowing.
//!
//! A schedule can hold thousands of entries, so views never materialize the
//! whole set. `compute_window` turns `(page, page_size, total_count)` into a
//! clamped fetch window; `Pager` holds the UI-facing state machine; and
//! `visible_rows` derives the virtualized sub-window of a page that actually
//! needs rendering.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Page sizes offered by the entry views.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [50, 100, 200, 500];

/// Page size used when the caller has not picked one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// A clamped pagination window.
///
/// `page` is 1-based and always within `[1, max(total_pages, 1)]`. An empty
/// data set yields `total_pages == 0` with `page` pinned to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl PageWindow {
    /// Zero-based index of the window's first row.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Maximum number of rows in the window.
    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }

    /// Number of rows actually covered by this window.
    pub fn len(&self) -> u64 {
        let offset = self.offset();
        if offset >= self.total_count {
            return 0;
        }
        (self.total_count - offset).min(self.page_size as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-based index of the window's last row, if the window is non-empty.
    pub fn last_row(&self) -> Option<u64> {
        let len = self.len();
        if len == 0 {
            None
        } else {
            Some(self.offset() + len - 1)
        }
    }
}

/// Compute a clamped window for a page request.
///
/// Out-of-range pages clamp rather than fail: requesting page 7 of 3 yields
/// page 3, and `total_count == 0` yields an empty window on page 1. Only a
/// zero `page_size` is an error, because no window can satisfy it.
pub fn compute_window(
    page: u32,
    page_size: u32,
    total_count: u64,
) -> Result<PageWindow, ValidationError> {
    if page_size == 0 {
        return Err(ValidationError::PageSize);
    }
    Ok(clamped_window(page, page_size, total_count))
}

/// Window computation once `page_size >= 1` is known to hold.
fn clamped_window(page: u32, page_size: u32, total_count: u64) -> PageWindow {
    let total_pages = total_count.div_ceil(page_size as u64).min(u32::MAX as u64) as u32;
    let page = page.clamp(1, total_pages.max(1));
    PageWindow {
        page,
        page_size,
        total_count,
        total_pages,
    }
}

/// Pagination state for an entry view.
///
/// The stored page may be out of range for the current data set; clamping
/// happens when a window is computed against a count. Changing the page size
/// always resets to page 1 so the caller never lands past the end of the
/// shrunken page space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    page_size: u32,
}

impl Pager {
    pub fn new() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Store a page request. Zero is treated as page 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Change the page size and reset to page 1.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::PageSize);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Compute the clamped window for the current state against a count.
    pub fn window(&self, total_count: u64) -> PageWindow {
        clamped_window(self.page, self.page_size, total_count)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

/// Contiguous run of rows within the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWindow {
    /// Index of the first row to render, relative to the page
    pub start: usize,
    /// Number of rows to render
    pub count: usize,
}

/// Derive the rows worth rendering for a scrolled viewport.
///
/// Pure function of scroll position and an estimated row extent; the result
/// is always a sub-range of `0..row_count`. `overscan` rows are added on both
/// sides to keep fast scrolling from flashing blanks. A non-positive or
/// non-finite `row_extent` disables virtualization and returns the full page.
pub fn visible_rows(
    scroll_offset: f64,
    viewport_extent: f64,
    row_extent: f64,
    row_count: usize,
    overscan: usize,
) -> RowWindow {
    if row_count == 0 {
        return RowWindow { start: 0, count: 0 };
    }
    if !row_extent.is_finite() || row_extent <= 0.0 {
        return RowWindow {
            start: 0,
            count: row_count,
        };
    }

    let scroll = scroll_offset.max(0.0);
    let viewport = viewport_extent.max(0.0);

    let first_visible = (scroll / row_extent).floor() as usize;
    let visible = (viewport / row_extent).ceil() as usize + 1;

    let start = first_visible.saturating_sub(overscan).min(row_count - 1);
    let end = (first_visible + visible + overscan).min(row_count);

    RowWindow {
        start,
        count: end.saturating_sub(start),
    }
}
