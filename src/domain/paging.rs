//! Offset-based pagination.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Normalized paging window plus the total row count once it is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paging {
    /// 1-based page index
    pub page: i64,
    /// items per page
    pub limit: i64,
    pub total: i64,
}

impl Paging {
    /// Missing or non-positive values fall back to page 1 and limit 10.
    pub fn normalize(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
        Self {
            page,
            limit,
            total: 0,
        }
    }

    /// Rows to skip before this page. Saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}
