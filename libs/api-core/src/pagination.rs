//! `page`/`limit` query convention shared by every list endpoint.

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Incoming `?page=&limit=` parameters, 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.limit())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

/// Standard list envelope: `{items, pagination}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, query: &PageQuery, total: i64) -> Self {
        let limit = query.limit();
        let pages = if total == 0 {
            0
        } else {
            (total + i64::from(limit) - 1) / i64::from(limit)
        };
        Self {
            items,
            pagination: PageInfo {
                page: query.page(),
                limit,
                total,
                pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<u32>, limit: Option<u32>) -> PageQuery {
        PageQuery { page, limit }
    }

    #[test]
    fn defaults_and_clamps() {
        let q = query(None, None);
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 20);
        assert_eq!(q.offset(), 0);

        let q = query(Some(0), Some(0));
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 1);

        let q = query(Some(3), Some(500));
        assert_eq!(q.limit(), 100);
        assert_eq!(q.offset(), 200);
    }

    #[test]
    fn page_count_rounds_up() {
        let q = query(Some(1), Some(20));
        assert_eq!(Paginated::<u8>::new(vec![], &q, 0).pagination.pages, 0);
        assert_eq!(Paginated::<u8>::new(vec![], &q, 20).pagination.pages, 1);
        assert_eq!(Paginated::<u8>::new(vec![], &q, 21).pagination.pages, 2);
    }
}
