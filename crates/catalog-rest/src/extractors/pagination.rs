//! Pagination extractor.

use catalog_core::{CatalogResult, PageRequest};
use serde::Deserialize;

/// Query parameters for pagination.
///
/// Missing values fall back to page 1 and a page size of 10.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl TryFrom<PaginationQuery> for PageRequest {
    type Error = catalog_core::CatalogError;

    fn try_from(query: PaginationQuery) -> CatalogResult<Self> {
        Self::new(
            query.page.unwrap_or(i64::from(Self::DEFAULT_PAGE)),
            query.page_size.unwrap_or(i64::from(Self::DEFAULT_PAGE_SIZE)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::try_from(PaginationQuery::default()).unwrap();
        assert_eq!(page, PageRequest::first());
    }

    #[test]
    fn test_camel_case_page_size() {
        let query: PaginationQuery = serde_json::from_str(r#"{"page":2,"pageSize":25}"#).unwrap();
        let page = PageRequest::try_from(query).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 25);
    }

    #[test]
    fn test_rejects_zero_page() {
        let query = PaginationQuery {
            page: Some(0),
            page_size: None,
        };
        assert!(PageRequest::try_from(query).is_err());
    }

    #[test]
    fn test_clamps_page_size() {
        let query = PaginationQuery {
            page: None,
            page_size: Some(1000),
        };
        assert_eq!(PageRequest::try_from(query).unwrap().page_size, 100);
    }
}
