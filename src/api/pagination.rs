use serde::{Deserialize, Serialize};

use crate::services::listing::{Listing, PageWindow};

pub(crate) const fn default_page() -> i64 {
    1
}

pub(crate) const fn default_limit() -> i64 {
    10
}

/// `?page=&limit=` shared by every list endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default = "default_page")]
    pub(crate) page: i64,
    #[serde(default = "default_limit")]
    pub(crate) limit: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: default_page(), limit: default_limit() }
    }
}

impl PageQuery {
    pub(crate) fn window(self) -> PageWindow {
        PageWindow::new(self.page, self.limit)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total: i64,
    pub(crate) page: i64,
    pub(crate) limit: i64,
}

impl<T> PaginatedResponse<T> {
    pub(crate) fn new(listing: Listing<T>, window: PageWindow) -> Self {
        Self { items: listing.items, total: listing.total, page: window.page, limit: window.limit }
    }
}
