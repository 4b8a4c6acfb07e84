//! Pagination types for list operations.

use crate::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};

/// A request for a page of results.
///
/// Pages are 1-indexed. Both page and page size must be at least 1; page sizes
/// above [`PageRequest::MAX_PAGE_SIZE`] are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub page_size: u32,
}

impl PageRequest {
    /// The default page number.
    pub const DEFAULT_PAGE: u32 = 1;
    /// The default page size.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Creates a new page request.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if `page` or `page_size` is below 1.
    pub fn new(page: i64, page_size: i64) -> CatalogResult<Self> {
        if page < 1 {
            return Err(CatalogError::validation("page must be at least 1"));
        }
        if page_size < 1 {
            return Err(CatalogError::validation("pageSize must be at least 1"));
        }

        let page = u32::try_from(page)
            .map_err(|_| CatalogError::validation("page is too large"))?;
        let page_size = u32::try_from(page_size.min(i64::from(Self::MAX_PAGE_SIZE)))
            .unwrap_or(Self::MAX_PAGE_SIZE);

        Ok(Self { page, page_size })
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request() {
        let req = PageRequest::new(3, 10).unwrap();
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps_size() {
        let req = PageRequest::new(1, 1000).unwrap();
        assert_eq!(req.page_size, PageRequest::MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_request_rejects_zero_and_negative() {
        assert!(matches!(PageRequest::new(0, 10), Err(CatalogError::Validation(_))));
        assert!(matches!(PageRequest::new(1, 0), Err(CatalogError::Validation(_))));
        assert!(matches!(PageRequest::new(-1, 10), Err(CatalogError::Validation(_))));
        assert!(matches!(PageRequest::new(1, -5), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_page_request_offset_calculation() {
        assert_eq!(PageRequest::new(1, 20).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(2, 20).unwrap().offset(), 20);
        assert_eq!(PageRequest::new(6, 15).unwrap().offset(), 75);
    }

    #[test]
    fn test_page_request_rejects_page_overflow() {
        assert!(PageRequest::new(i64::MAX, 10).is_err());
    }
}
