//! Offset pagination shared by every list endpoint.
//!
//! Requests carry `page` / `per_page`; responses carry a [`PageMeta`] next to
//! the returned rows.

use serde::{Deserialize, Serialize};

/// Default number of rows per page.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Upper bound for `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Sort direction accepted by list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Builds a page window from optional query values, clamping out-of-range
    /// input instead of rejecting it.
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Metadata for a page given the total number of matching rows.
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages: total_pages(total, self.per_page),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination block returned with list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: u32,
}

/// A page of rows plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: PageRequest, total: i64) -> Self {
        Self {
            data,
            meta: page.meta(total),
        }
    }

    /// Converts every row, keeping the metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Number of pages needed for `total` rows.
pub fn total_pages(total: i64, per_page: u32) -> u32 {
    if total <= 0 || per_page == 0 {
        return 0;
    }
    ((total + per_page as i64 - 1) / per_page as i64) as u32
}

/// Wraps a search term for use with `ILIKE`, escaping wildcard characters.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let page = PageRequest::new(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps() {
        let page = PageRequest::new(Some(0), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, MAX_PER_PAGE);

        let page = PageRequest::new(Some(3), Some(0));
        assert_eq!(page.per_page, 1);
    }

    #[test]
    fn test_offset() {
        let page = PageRequest::new(Some(3), Some(20));
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 15), 0);
        assert_eq!(total_pages(1, 15), 1);
        assert_eq!(total_pages(15, 15), 1);
        assert_eq!(total_pages(16, 15), 2);
        assert_eq!(total_pages(100, 0), 0);
    }

    #[test]
    fn test_meta_and_map() {
        let page = PageRequest::new(Some(2), Some(2));
        let paginated = Paginated::new(vec![1, 2], page, 5).map(|n| n * 10);
        assert_eq!(paginated.data, vec![10, 20]);
        assert_eq!(
            paginated.meta,
            PageMeta {
                page: 2,
                per_page: 2,
                total: 5,
                total_pages: 3
            }
        );
    }

    #[test]
    fn test_paginated_serialization() {
        let paginated = Paginated::new(vec!["a"], PageRequest::default(), 1);
        let json = serde_json::to_value(&paginated).unwrap();
        assert_eq!(json["data"][0], "a");
        assert_eq!(json["meta"]["total_pages"], 1);
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        let order: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, SortOrder::Asc);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("pizza"), "%pizza%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
