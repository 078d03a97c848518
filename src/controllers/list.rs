//! Paginated list controller
//!
//! Holds filter state and the last page fetched with it. Filter edits go
//! through [`compute_next_fetch`] to decide what to request; the controller
//! runs the request and commits filter, items and pagination together only
//! when it succeeds.

use crate::controllers::LastError;
use crate::core::entity::Record;
use crate::core::error::{AdminError, AdminResult};
use crate::core::query::{FilterChange, ListFilter, Page, PaginationMeta, compute_next_fetch};
use crate::core::service::PageSource;
use crate::core::session::Session;
use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "request in flight" flag
///
/// Clones observe the same flag, so a view can watch it while the
/// controller is busy.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag until the returned guard is dropped
    pub fn acquire(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(self.0.clone())
    }
}

/// Clears the loading flag on drop, including when a request future is
/// dropped before completing
#[derive(Debug)]
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Filter state plus last-known-good page for one listing
pub struct ListController<T: Record, S> {
    source: Arc<dyn PageSource<T, S>>,
    filter: ListFilter<S>,
    page: Page<T>,
    loaded: bool,
    loading: LoadingFlag,
    last_error: Option<LastError>,
}

impl<T, S> ListController<T, S>
where
    T: Record,
    S: Clone + PartialEq + Send + Sync + 'static,
{
    /// Controller with an initial filter; nothing is fetched until `refresh`
    pub fn new(source: Arc<dyn PageSource<T, S>>, filter: ListFilter<S>) -> Self {
        Self {
            source,
            filter,
            page: Page::default(),
            loaded: false,
            loading: LoadingFlag::new(),
            last_error: None,
        }
    }

    pub fn filter(&self) -> &ListFilter<S> {
        &self.filter
    }

    pub fn items(&self) -> &[T] {
        &self.page.items
    }

    pub fn pagination(&self) -> &PaginationMeta {
        &self.page.pagination
    }

    /// Whether at least one fetch has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Handle for observing the loading flag from elsewhere
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// Find a displayed record by identity
    pub fn find(&self, id: &str) -> Option<&T> {
        self.page.items.iter().find(|r| r.id() == id)
    }

    /// Refetch the current filter
    pub async fn refresh(&mut self, session: &Session) -> AdminResult<()> {
        let filter = self.filter.clone();
        self.fetch(session, filter).await
    }

    /// Apply a filter edit, fetching only when it changes what is displayed
    ///
    /// Returns whether a fetch ran.
    pub async fn apply(&mut self, session: &Session, change: FilterChange<S>) -> AdminResult<bool> {
        let next = self.filter.apply(change);
        let Some(request) = compute_next_fetch(&self.filter, &next) else {
            return Ok(false);
        };
        tracing::debug!(
            resource = T::resource_name(),
            page = request.filter.page,
            reason = ?request.reason,
            "filter changed"
        );
        self.fetch(session, request.filter).await?;
        Ok(true)
    }

    /// Navigate to page `n`; out-of-range pages are ignored
    pub async fn go_to_page(&mut self, session: &Session, n: u32) -> AdminResult<bool> {
        if !self.page.pagination.contains_page(n) {
            tracing::debug!(
                resource = T::resource_name(),
                requested = n,
                pages = self.page.pagination.pages,
                "page out of range, ignoring"
            );
            return Ok(false);
        }
        self.apply(session, FilterChange::Page(n)).await
    }

    pub async fn next_page(&mut self, session: &Session) -> AdminResult<bool> {
        let n = self.filter.page.saturating_add(1);
        self.go_to_page(session, n).await
    }

    pub async fn prev_page(&mut self, session: &Session) -> AdminResult<bool> {
        let n = self.filter.page.saturating_sub(1);
        self.go_to_page(session, n).await
    }

    /// Restrict by status; always lands on page 1
    pub async fn set_status(&mut self, session: &Session, status: Option<S>) -> AdminResult<bool> {
        self.apply(session, FilterChange::Status(status)).await
    }

    pub async fn set_limit(&mut self, session: &Session, limit: u32) -> AdminResult<bool> {
        self.apply(session, FilterChange::Limit(limit)).await
    }

    pub async fn set_date_range(
        &mut self,
        session: &Session,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AdminResult<bool> {
        self.apply(session, FilterChange::DateRange { start, end })
            .await
    }

    pub async fn set_search(
        &mut self,
        session: &Session,
        search: Option<String>,
    ) -> AdminResult<bool> {
        self.apply(session, FilterChange::Search(search)).await
    }

    /// Run one fetch and commit it, or keep the previous state on failure
    async fn fetch(&mut self, session: &Session, filter: ListFilter<S>) -> AdminResult<()> {
        let _loading = self.loading.acquire();

        let fetched = self.source.fetch_page(session, &filter).await;
        let mut page = match fetched {
            Ok(page) => page,
            Err(err) => return Err(self.record_failure(err)),
        };
        let mut filter = filter;

        // The result set shrank under us: show its last page instead
        let pages = page.pagination.pages;
        if pages >= 1 && filter.page > pages {
            filter.page = pages;
            let refetched = self.source.fetch_page(session, &filter).await;
            page = match refetched {
                Ok(page) => page,
                Err(err) => return Err(self.record_failure(err)),
            };
        }

        tracing::debug!(
            resource = T::resource_name(),
            page = page.pagination.page,
            total = page.pagination.total,
            "page loaded"
        );
        self.filter = filter;
        self.page = page;
        self.loaded = true;
        self.last_error = None;
        Ok(())
    }

    fn record_failure(&mut self, err: AdminError) -> AdminError {
        tracing::warn!(
            resource = T::resource_name(),
            code = err.error_code(),
            error = %err,
            "failed to fetch list; keeping last loaded page"
        );
        self.last_error = Some(LastError::from(&err));
        err
    }
}
