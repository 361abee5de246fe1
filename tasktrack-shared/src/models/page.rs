/// Paginated result wrapper
///
/// Carries one page of records together with the totals a client needs to
/// render pagination controls.
///
/// # Example
///
/// ```
/// use tasktrack_shared::models::page::Page;
///
/// let page = Page::new(vec![1, 2, 3, 4, 5], 25, 3, 10);
/// assert_eq!(page.total_pages, 3);
/// assert!(!page.has_next_page);
/// assert_eq!(page.prev_page, Some(2));
/// ```

use serde::{Deserialize, Serialize};

/// One page of a larger result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page
    pub docs: Vec<T>,

    /// Number of records matching the query across all pages
    pub total_docs: i64,

    /// Page size used for this query
    pub limit: i64,

    /// Current page number (1-based)
    pub page: i64,

    /// ceil(total_docs / limit)
    pub total_pages: i64,

    /// 1-based position of the first record of this page in the full result
    pub paging_counter: i64,

    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl<T> Page<T> {
    /// Builds a page from its records and the query's totals
    ///
    /// `page` and `limit` must already be normalized to at least 1.
    pub fn new(docs: Vec<T>, total_docs: i64, page: i64, limit: i64) -> Self {
        let total_pages = total_docs / limit + i64::from(total_docs % limit != 0);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            docs,
            total_docs,
            limit,
            page,
            total_pages,
            paging_counter: (page - 1).saturating_mul(limit).saturating_add(1),
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    /// An empty page for a query known to match nothing
    pub fn empty(page: i64, limit: i64) -> Self {
        Self::new(Vec::new(), 0, page, limit)
    }
}
