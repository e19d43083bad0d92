//! Pagination and search state for the deletion log.
//!
//! Every mutator keeps `1 <= current_page <= total_pages` and reports whether
//! the change needs a reload.

use cleango_config::DEFAULT_PAGE_SIZE;

use crate::model::{PageQuery, normalize_search};

/// Local view of where the operator is in the deletion log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    total_pages: u32,
    page_size: u32,
    search_term: String,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// Start on page one of one with the given page size.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size: page_size.max(1),
            search_term: String::new(),
        }
    }

    /// Current one-based page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Pages reported by the last loaded page.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Normalised search term; empty when no filter applies.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Move to `page`. Out-of-range or unchanged targets are ignored.
    pub fn set_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Advance one page when possible.
    pub fn next_page(&mut self) -> bool {
        self.set_page(self.current_page.saturating_add(1))
    }

    /// Go back one page when possible.
    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.current_page.saturating_sub(1))
    }

    /// Change the page size and return to page one.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if page_size == 0 || (page_size == self.page_size && self.current_page == 1) {
            return false;
        }
        self.page_size = page_size;
        self.current_page = 1;
        true
    }

    /// Change the search filter and return to page one.
    pub fn set_search_term(&mut self, term: &str) -> bool {
        let normalized = normalize_search(term).unwrap_or_default();
        if normalized == self.search_term && self.current_page == 1 {
            return false;
        }
        self.search_term = normalized;
        self.current_page = 1;
        true
    }

    /// Adopt the server's page and page count, clamping into range.
    ///
    /// Returns `true` when clamping moved the page away from what the server sent.
    pub fn apply_server_page(&mut self, page: u32, total_pages: u32) -> bool {
        self.total_pages = total_pages.max(1);
        self.current_page = page.clamp(1, self.total_pages);
        self.current_page != page
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// `"Page X of Y"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }

    /// Request parameters for the current position.
    #[must_use]
    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.current_page, self.page_size, &self.search_term)
    }
}
