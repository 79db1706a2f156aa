//! Page cursor for the home feed.

/// Tracks list-fetch progress: current page, whether more exist, and whether
/// a next-page load is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    page: u32,
    has_more: bool,
    loading_more: bool,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            page: 1,
            has_more: true,
            loading_more: false,
        }
    }
}

impl PaginationCursor {
    /// Creates a cursor at page 1 with more pages assumed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn loading_more(&self) -> bool {
        self.loading_more
    }

    /// Returns to (1, has more, not loading).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    /// Marks a next-page load as started and returns the page to request.
    ///
    /// Returns `None` without touching the cursor when there is nothing more
    /// to load or a load is already running.
    pub fn begin_advance(&mut self) -> Option<u32> {
        if !self.has_more || self.loading_more {
            return None;
        }
        self.loading_more = true;
        Some(self.page + 1)
    }

    /// Records a successfully loaded page.
    pub fn complete_advance(&mut self, page: u32, has_more: bool) {
        self.page = page;
        self.has_more = has_more;
        self.loading_more = false;
    }

    /// Stops further loading after a failed page.
    pub fn halt(&mut self) {
        self.has_more = false;
        self.loading_more = false;
    }
}
