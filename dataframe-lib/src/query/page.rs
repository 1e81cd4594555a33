//! Pagination window.

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered when none are configured.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// A 1-indexed page window over a row count.
///
/// Changing the page size returns to page 1; requested pages beyond the last
/// one are clamped to it.
///
/// # Example
///
/// ```
/// use dataframe_lib::query::Pagination;
///
/// let mut pages = Pagination::new().page_size(25);
/// assert_eq!(pages.total_pages(60), 3);
///
/// pages.set_page(9, 60);
/// assert_eq!(pages.page, 3);
/// assert_eq!(pages.range(60), 50..60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Current page, starting at 1.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Page sizes offered to the user.
    pub page_size_options: Vec<usize>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rows per page (builder pattern). Zero is treated as one.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Sets the offered page sizes (builder pattern).
    pub fn page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// Number of pages for `total` rows; zero rows means zero pages.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.max(1))
    }

    /// Moves to a page, clamped to `1..=total_pages`.
    pub fn set_page(&mut self, page: usize, total: usize) {
        let last = self.total_pages(total).max(1);
        self.page = page.clamp(1, last);
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Advances one page if there is one. Returns `true` if the page changed.
    pub fn next(&mut self, total: usize) -> bool {
        if self.page < self.total_pages(total) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one page if there is one. Returns `true` if the page changed.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Index range of the current page over `total` rows.
    ///
    /// A stale page beyond the end yields the last page's range.
    pub fn range(&self, total: usize) -> Range<usize> {
        let size = self.page_size.max(1);
        let page = self.page.clamp(1, self.total_pages(total).max(1));
        let start = ((page - 1) * size).min(total);
        let end = (start + size).min(total);
        start..end
    }

    /// Slices the current page out of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    /// Footer information for `total` rows.
    pub fn info(&self, total: usize) -> PageInfo {
        let total_pages = self.total_pages(total);
        let range = self.range(total);
        let page = self.page.clamp(1, total_pages.max(1));
        PageInfo {
            page,
            page_size: self.page_size,
            total_items: total,
            total_pages,
            start: if range.is_empty() { 0 } else { range.start + 1 },
            end: range.end,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}

/// Pagination footer data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// Zero when there are no rows.
    pub total_pages: usize,
    /// 1-based index of the first row shown, 0 when nothing is shown.
    pub start: usize,
    /// 1-based index of the last row shown.
    pub end: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl std::fmt::Display for PageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} results (page {} of {})",
            self.start,
            self.end,
            self.total_items,
            self.page,
            self.total_pages.max(1)
        )
    }
}
