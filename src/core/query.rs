//! List filters, pagination metadata, and the fetch decision function
//!
//! [`compute_next_fetch`] decides *what* to fetch when a filter changes; the
//! list controller decides *when*. Keeping the decision pure means page-reset
//! rules can be tested without any backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default number of rows per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Filter state for a paginated listing
///
/// `S` is the status type accepted by the listing (order status for orders,
/// account status for users and consumers).
///
/// # Example
/// ```rust,ignore
/// let filter = ListFilter::<OrderStatus>::default()
///     .apply(FilterChange::Status(Some(OrderStatus::Pending)));
/// // GET /api/admin/orders?page=1&limit=10&status=PENDING
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter<S> {
    /// Page number (starts at 1)
    pub page: u32,

    /// Number of items per page
    pub limit: u32,

    /// Status restriction; `None` means all statuses
    pub status: Option<S>,

    /// Inclusive lower date bound
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper date bound
    pub end_date: Option<NaiveDate>,

    /// Free text search; `None` means no search
    pub search: Option<String>,
}

impl<S> Default for ListFilter<S> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

/// A single user-driven edit to a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange<S> {
    Page(u32),
    Limit(u32),
    Status(Option<S>),
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Search(Option<String>),
}

impl<S> ListFilter<S> {
    /// First page with the given page size (minimum 1)
    pub fn with_limit(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            status: None,
            start_date: None,
            end_date: None,
            search: None,
        }
    }
}

impl<S: Clone + PartialEq> ListFilter<S> {
    /// Apply a change, resetting to page 1 when anything but the page moved
    pub fn apply(&self, change: FilterChange<S>) -> Self {
        let mut next = self.clone();
        match change {
            FilterChange::Page(page) => {
                next.page = page.max(1);
                return next;
            }
            FilterChange::Limit(limit) => next.limit = limit.max(1),
            FilterChange::Status(status) => next.status = status,
            FilterChange::DateRange { start, end } => {
                next.start_date = start;
                next.end_date = end;
            }
            FilterChange::Search(search) => next.search = normalize_search(search),
        }
        next.page = 1;
        next
    }

    /// True when any field other than `page` differs
    pub fn criteria_differ(&self, other: &Self) -> bool {
        self.limit != other.limit
            || self.status != other.status
            || self.start_date != other.start_date
            || self.end_date != other.end_date
            || self.search != other.search
    }
}

impl<S: AsRef<str>> ListFilter<S> {
    /// Query string pairs; unset optional fields are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_ref().to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Why a fetch was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    /// Only the page number moved
    PageChanged,
    /// Status, dates, search or page size moved
    CriteriaChanged,
}

/// A fetch the list controller should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest<S> {
    pub filter: ListFilter<S>,
    pub reason: FetchReason,
}

/// Decide what to fetch after a filter edit
///
/// Returns `None` when nothing changed. When any non-page field changed the
/// request always targets page 1, whatever page the new filter carries.
pub fn compute_next_fetch<S: Clone + PartialEq>(
    previous: &ListFilter<S>,
    new: &ListFilter<S>,
) -> Option<FetchRequest<S>> {
    if previous == new {
        return None;
    }

    let mut filter = new.clone();
    filter.page = filter.page.max(1);
    filter.limit = filter.limit.max(1);

    if previous.criteria_differ(new) {
        filter.page = 1;
        return Some(FetchRequest {
            filter,
            reason: FetchReason::CriteriaChanged,
        });
    }

    if filter.page == previous.page {
        return None;
    }

    Some(FetchRequest {
        filter,
        reason: FetchReason::PageChanged,
    })
}

/// Pagination metadata as returned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Total number of items (after filters)
    pub total: u64,

    /// Current page number (starts at 1)
    pub page: u32,

    /// Number of items per page
    pub limit: u32,

    /// Total number of pages
    pub pages: u32,
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            limit: DEFAULT_LIMIT,
            pages: 0,
        }
    }
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let pages = total.div_ceil(limit as u64) as u32;
        Self {
            total,
            page: page.clamp(1, pages.max(1)),
            limit,
            pages,
        }
    }

    /// Whether a previous page exists
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Whether `page` can be navigated to
    pub fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.pages
    }

    /// 1-based inclusive row range shown on this page ("Showing X to Y of Z")
    pub fn display_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let start = (self.page as u64 - 1) * self.limit as u64 + 1;
        if start > self.total {
            return None;
        }
        let end = (self.page as u64 * self.limit as u64).min(self.total);
        Some((start, end))
    }
}

/// One page of records plus its pagination metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationMeta::default(),
        }
    }
}

impl<T> Page<T> {
    /// Slice an already filtered, ordered collection into one page
    pub fn from_slice(all: Vec<T>, page: u32, limit: u32) -> Self {
        let pagination = PaginationMeta::new(page, limit, all.len() as u64);
        let start = (pagination.page as usize - 1) * pagination.limit as usize;
        let items = all
            .into_iter()
            .skip(start)
            .take(pagination.limit as usize)
            .collect();
        Self { items, pagination }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::OrderStatus;

    fn filter() -> ListFilter<OrderStatus> {
        ListFilter::default()
    }

    #[test]
    fn test_filter_defaults() {
        let f = filter();
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, 10);
        assert!(f.status.is_none());
    }

    #[test]
    fn test_status_change_resets_page_for_all_prior_pages() {
        for prior in 1..=50 {
            let mut f = filter();
            f.page = prior;
            let next = f.apply(FilterChange::Status(Some(OrderStatus::Pending)));
            assert_eq!(next.page, 1);
        }
    }

    #[test]
    fn test_page_change_keeps_criteria() {
        let f = filter().apply(FilterChange::Status(Some(OrderStatus::InTransit)));
        let next = f.apply(FilterChange::Page(3));
        assert_eq!(next.page, 3);
        assert_eq!(next.status, Some(OrderStatus::InTransit));
    }

    #[test]
    fn test_blank_search_is_none() {
        let f = filter().apply(FilterChange::Search(Some("   ".into())));
        assert!(f.search.is_none());
        let f = filter().apply(FilterChange::Search(Some(" acme ".into())));
        assert_eq!(f.search.as_deref(), Some("acme"));
    }

    #[test]
    fn test_compute_next_fetch_noop_when_unchanged() {
        assert!(compute_next_fetch(&filter(), &filter()).is_none());
    }

    #[test]
    fn test_compute_next_fetch_forces_page_one_on_criteria_change() {
        let previous = ListFilter {
            page: 4,
            ..filter()
        };
        // Caller forgot to reset the page
        let new = ListFilter {
            page: 4,
            status: Some(OrderStatus::Delivered),
            ..filter()
        };
        let request = compute_next_fetch(&previous, &new).unwrap();
        assert_eq!(request.filter.page, 1);
        assert_eq!(request.reason, FetchReason::CriteriaChanged);
    }

    #[test]
    fn test_compute_next_fetch_page_only() {
        let new = filter().apply(FilterChange::Page(2));
        let request = compute_next_fetch(&filter(), &new).unwrap();
        assert_eq!(request.filter.page, 2);
        assert_eq!(request.reason, FetchReason::PageChanged);
    }

    #[test]
    fn test_query_pairs_omit_unset_fields() {
        let pairs = filter().query_pairs();
        assert_eq!(
            pairs,
            vec![("page", "1".to_string()), ("limit", "10".to_string())]
        );

        let f = filter()
            .apply(FilterChange::Status(Some(OrderStatus::ReadyForPickup)))
            .apply(FilterChange::DateRange {
                start: NaiveDate::from_ymd_opt(2025, 1, 1),
                end: NaiveDate::from_ymd_opt(2025, 1, 31),
            });
        let pairs = f.query_pairs();
        assert!(pairs.contains(&("status", "READY_FOR_PICKUP".to_string())));
        assert!(pairs.contains(&("startDate", "2025-01-01".to_string())));
        assert!(pairs.contains(&("endDate", "2025-01-31".to_string())));
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 10, 23);
        assert_eq!(meta.pages, 3);
        assert!(!meta.has_prev());
        assert!(meta.has_next());
        assert_eq!(meta.display_range(), Some((1, 10)));

        let last = PaginationMeta::new(3, 10, 23);
        assert!(!last.has_next());
        assert_eq!(last.display_range(), Some((21, 23)));
    }

    #[test]
    fn test_pagination_meta_page_within_bounds() {
        let meta = PaginationMeta::new(9, 10, 23);
        assert_eq!(meta.page, 3);
        let empty = PaginationMeta::new(5, 10, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.pages, 0);
        assert_eq!(empty.display_range(), None);
        assert!(!empty.contains_page(1));
    }

    #[test]
    fn test_page_from_slice() {
        let page = Page::from_slice((1..=23).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.pagination.page, 3);
        assert_eq!(page.pagination.total, 23);
    }
}
