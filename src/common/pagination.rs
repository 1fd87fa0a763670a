// Page/limit query handling for list endpoints

use serde::Deserialize;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Highest page number whose offset still fits in an `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// `?page=&limit=` query parameters
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Resolved pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Page is between 1 and `MAX_PAGE`, limit is between 1 and `MAX_PAGE_SIZE`
    pub fn resolve(&self, default_limit: i64) -> Page {
        Page {
            page: self.page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed for `total` items
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}
