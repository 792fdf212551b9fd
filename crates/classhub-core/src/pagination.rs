//! Pagination and sorting for list endpoints.
//!
//! Every list endpoint accepts `page`, `limit`, `sortBy`, and `sortOrder`
//! query parameters and resolves them into a page/skip/order specification.
//! Resolution never fails: malformed numbers, `page <= 0`, and unrecognized
//! sort columns all fall back to defaults.
//!
//! Sorting is single-column. The requested `sortBy` is resolved through the
//! calling resource's allow-list of sortable columns, so nothing
//! user-supplied reaches an ORDER BY clause except through that list.
//!
//! # Example
//!
//! ```ignore
//! // GET /api/teachers?page=2&limit=10&sortBy=joining_date&sortOrder=asc
//! let query: PageQuery = ...;
//! assert_eq!(query.page(), 2);
//! assert_eq!(query.skip(), 10);
//! assert_eq!(query.order_clause(TEACHER_SORT_FIELDS), "joining_date ASC");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::coerce::lenient_i64;

pub const DEFAULT_LIMIT: i64 = 15;
pub const MAX_LIMIT: i64 = 100;

/// Sort direction for a resolved order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Pagination and sorting query parameters.
///
/// `page` and `limit` coerce leniently; `sortBy`/`sortOrder` are resolved
/// through [`PageQuery::order_clause`] against a per-resource allow-list.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, 1-indexed (default: 1)
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>)]
    pub page: Option<i64>,
    /// Items per page (default: 15, max: 100)
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>)]
    pub limit: Option<i64>,
    /// Sort column, resolved against the resource's sortable columns
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default: desc)
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

impl PageQuery {
    /// Effective page number; `page <= 0` and malformed values coerce to 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to [1, 100]. Defaults to 15.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Rows to skip; always derived as `(page - 1) * limit`.
    #[must_use]
    pub fn skip(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// Requested sort direction; anything other than `asc` means descending.
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        match self.sort_order.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// Resolves the requested sort column against the resource's allow-list,
    /// falling back to `id` for unrecognized or missing columns.
    #[must_use]
    pub fn sort_column<'a>(&self, allowed: &'a [&'a str]) -> &'a str {
        self.sort_by
            .as_deref()
            .and_then(|requested| allowed.iter().copied().find(|col| *col == requested))
            .unwrap_or("id")
    }

    /// Full ORDER BY fragment, e.g. `"joining_date ASC"`.
    #[must_use]
    pub fn order_clause(&self, allowed: &[&str]) -> String {
        format!("{} {}", self.sort_column(allowed), self.sort_order().as_sql())
    }

    /// Response metadata for this page given the filtered total.
    #[must_use]
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            page: self.page(),
            limit: self.limit(),
            total,
        }
    }
}

/// Metadata attached to every paginated response.
///
/// `total` counts rows matching the same filter predicate as the page of
/// data, so callers can derive total pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// Standard list response envelope: `{data, meta}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, meta: PaginationMeta) -> Self {
        Self { data, meta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORT_FIELDS: &[&str] = &["id", "name", "joining_date", "created_at"];

    fn query(s: &str) -> PageQuery {
        serde_urlencoded::from_str(s).unwrap()
    }

    #[test]
    fn test_defaults() {
        let q = query("");
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 15);
        assert_eq!(q.skip(), 0);
        assert_eq!(q.sort_column(SORT_FIELDS), "id");
        assert_eq!(q.sort_order(), SortOrder::Desc);
    }

    #[test]
    fn test_page_and_limit_applied() {
        let q = query("page=2&limit=10");
        assert_eq!(q.page(), 2);
        assert_eq!(q.limit(), 10);
        assert_eq!(q.skip(), 10);
    }

    #[test]
    fn test_non_positive_page_coerces_to_one() {
        for raw in ["page=0", "page=-3"] {
            let q = query(raw);
            assert_eq!(q.page(), 1);
            assert_eq!(q.skip(), 0);
        }
    }

    #[test]
    fn test_non_numeric_page_and_limit_fall_back() {
        let q = query("page=abc&limit=xyz");
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 15);
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(query("limit=0").limit(), 1);
        assert_eq!(query("limit=250").limit(), 100);
        assert_eq!(query("limit=-5").limit(), 1);
    }

    #[test]
    fn test_skip_is_always_derived() {
        let cases = [(1, 15, 0), (2, 15, 15), (3, 10, 20), (7, 25, 150)];
        for (page, limit, expected) in cases {
            let q = query(&format!("page={page}&limit={limit}"));
            assert_eq!(q.skip(), expected);
            assert_eq!(q.skip(), (q.page() - 1) * q.limit());
        }
    }

    #[test]
    fn test_sort_column_allow_list() {
        assert_eq!(query("sortBy=name").sort_column(SORT_FIELDS), "name");
        assert_eq!(
            query("sortBy=joining_date").sort_column(SORT_FIELDS),
            "joining_date"
        );
    }

    #[test]
    fn test_unrecognized_sort_column_falls_back_to_id() {
        let q = query("sortBy=password;%20DROP%20TABLE%20teachers");
        assert_eq!(q.sort_column(SORT_FIELDS), "id");
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!(query("sortOrder=asc").sort_order(), SortOrder::Asc);
        assert_eq!(query("sortOrder=ASC").sort_order(), SortOrder::Asc);
        assert_eq!(query("sortOrder=desc").sort_order(), SortOrder::Desc);
        assert_eq!(query("sortOrder=sideways").sort_order(), SortOrder::Desc);
    }

    #[test]
    fn test_order_clause() {
        let q = query("sortBy=name&sortOrder=asc");
        assert_eq!(q.order_clause(SORT_FIELDS), "name ASC");
        assert_eq!(query("").order_clause(SORT_FIELDS), "id DESC");
    }

    #[test]
    fn test_unknown_query_keys_are_dropped() {
        // Only declared keys survive deserialization
        let q = query("page=2&colour=blue&nested[key]=1");
        assert_eq!(q.page(), 2);
        assert!(q.sort_by.is_none());
    }

    #[test]
    fn test_meta_reflects_effective_values() {
        let q = query("page=0&limit=999");
        let meta = q.meta(42);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.limit, 100);
        assert_eq!(meta.total, 42);
    }

    #[test]
    fn test_meta_serializes_to_wire_shape() {
        let meta = query("page=2&limit=10").meta(25);
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"page":2,"limit":10,"total":25}"#);
    }
}
