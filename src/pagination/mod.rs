//! Bounds-safe page window over an ordered sequence.
//!
//! The paginator does not own the sequence. Every operation is told the
//! current source length, so the sequence may grow or shrink between calls
//! (search narrowing, floor changes) without the page ever going out of
//! range.

use crate::domain::ValidationError;

/// Snapshot of the pagination state, for "page X of Y" rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based current page
    pub current_page: usize,

    /// Last page; never less than 1
    pub max_page: usize,

    pub items_per_page: usize,

    /// Source length the state was computed against
    pub source_len: usize,
}

impl PageState {
    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.max_page
    }

    /// Zero-based offset of the first item on the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1).saturating_mul(self.items_per_page)
    }
}

/// Sliding page window, independent of what the items are.
#[derive(Debug, Clone)]
pub struct Paginator {
    current_page: usize,
    items_per_page: usize,
    source_len: usize,
}

impl Paginator {
    /// Page size used by the dashboard tables.
    pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

    /// Create a paginator starting on page 1.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPageSize` for a page size of zero.
    pub fn new(items_per_page: usize) -> Result<Self, ValidationError> {
        if items_per_page == 0 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(Self {
            current_page: 1,
            items_per_page,
            source_len: 0,
        })
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Last page for the most recently observed source length.
    pub fn max_page(&self) -> usize {
        self.max_page_for(self.source_len)
    }

    /// `max(1, ceil(len / items_per_page))`
    pub fn max_page_for(&self, len: usize) -> usize {
        len.div_ceil(self.items_per_page).max(1)
    }

    /// Record the current source length.
    ///
    /// If the source shrank past the current page, or is now empty, the
    /// page goes back to 1 rather than to the new last page.
    pub fn observe(&mut self, len: usize) {
        self.source_len = len;
        if len == 0 || self.current_page > self.max_page_for(len) {
            self.current_page = 1;
        }
    }

    /// The items on the current page. Empty when the source is empty.
    pub fn current_slice<'a, T>(&mut self, source: &'a [T]) -> &'a [T] {
        self.observe(source.len());
        let offset = (self.current_page - 1).saturating_mul(self.items_per_page);
        if offset >= source.len() {
            return &[];
        }
        let end = offset
            .saturating_add(self.items_per_page)
            .min(source.len());
        &source[offset..end]
    }

    /// Advance one page, stopping at the last page.
    pub fn next(&mut self, len: usize) -> usize {
        self.observe(len);
        self.current_page = (self.current_page + 1).min(self.max_page_for(len));
        self.current_page
    }

    /// Go back one page, stopping at page 1.
    pub fn previous(&mut self, len: usize) -> usize {
        self.observe(len);
        self.current_page = self.current_page.saturating_sub(1).max(1);
        self.current_page
    }

    /// Go to `target`, clamped into `[1, max_page]`.
    pub fn jump(&mut self, target: i64, len: usize) -> usize {
        self.observe(len);
        let max_page = self.max_page_for(len);
        self.current_page = if target < 1 {
            1
        } else {
            usize::try_from(target).unwrap_or(usize::MAX).min(max_page)
        };
        self.current_page
    }

    /// Go back to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn state(&self) -> PageState {
        PageState {
            current_page: self.current_page,
            max_page: self.max_page(),
            items_per_page: self.items_per_page,
            source_len: self.source_len,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: Self::DEFAULT_ITEMS_PER_PAGE,
            source_len: 0,
        }
    }
}
