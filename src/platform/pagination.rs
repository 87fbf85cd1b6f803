//! Page-number pagination driven by GitLab's `X-Next-Page` header

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Next page number announced by the server
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// A page with a follow-up page
    pub const fn new(items: Vec<T>, next_page: Option<u32>) -> Self {
        Self { items, next_page }
    }

    /// The final page
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}

/// Tracks which page to request next
///
/// Iteration ends on an empty page or a missing next page; both are
/// handled the same way. A next page that does not move forward also ends
/// iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    next: Option<u32>,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    /// Cursor positioned at page 1
    pub const fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Page to fetch next, or `None` when done
    pub const fn next_page(&self) -> Option<u32> {
        self.next
    }

    /// Record a fetched page and move forward
    pub fn advance<T>(&mut self, page: &Page<T>) {
        let current = self.next.unwrap_or(0);
        self.next = match page.next_page {
            _ if page.items.is_empty() => None,
            Some(next) if next > current => Some(next),
            _ => None,
        };
    }
}
