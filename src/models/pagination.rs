//! Page arithmetic shared by list endpoints

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    /// Page defaults to 1, per_page to 20 and is clamped to 1..=100
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }

    /// Apply to a list already held in memory
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        items
            .into_iter()
            .skip(offset)
            .take(self.per_page as usize)
            .collect()
    }

    pub fn respond<T>(&self, items: Vec<T>, total: i64) -> PaginatedResponse<T>
    where
        T: for<'a> ToSchema<'a>,
    {
        PaginatedResponse {
            items,
            total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages(total),
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(Pagination::new(None, None), Pagination { page: 1, per_page: 20 });
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination { page: 1, per_page: 1 });
        assert_eq!(Pagination::new(Some(-3), Some(500)).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_offset_and_total_pages() {
        let p = Pagination::new(Some(3), Some(10));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(30), 3);
        assert_eq!(p.total_pages(31), 4);
    }

    #[test]
    fn test_slice() {
        let items: Vec<i32> = (1..=25).collect();
        assert_eq!(Pagination::new(Some(3), Some(10)).slice(items.clone()), vec![21, 22, 23, 24, 25]);
        assert!(Pagination::new(Some(4), Some(10)).slice(items).is_empty());
    }
}
