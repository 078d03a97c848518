//! Users and consumers views

use crate::controllers::LastError;
use crate::controllers::list::{ListController, LoadingFlag};
use crate::core::error::{AdminError, AdminResult};
use crate::core::query::ListFilter;
use crate::core::service::AdminBackend;
use crate::core::session::Session;
use crate::entities::{AccountStatus, Consumer, ConsumerStats, User, UserDetails};
use std::sync::Arc;

/// Paginated users with a detail drill-down
pub struct UsersController<B: AdminBackend + 'static> {
    backend: Arc<B>,
    list: ListController<User, AccountStatus>,
    selected: Option<UserDetails>,
    loading: LoadingFlag,
    last_error: Option<LastError>,
}

impl<B: AdminBackend + 'static> UsersController<B> {
    pub fn new(backend: Arc<B>, limit: u32) -> Self {
        Self::with_filter(backend, ListFilter::with_limit(limit))
    }

    /// Controller starting from an arbitrary filter; nothing is fetched yet
    pub fn with_filter(backend: Arc<B>, filter: ListFilter<AccountStatus>) -> Self {
        let list = ListController::<User, AccountStatus>::new(backend.clone(), filter);
        Self {
            backend,
            list,
            selected: None,
            loading: LoadingFlag::new(),
            last_error: None,
        }
    }

    pub fn list(&self) -> &ListController<User, AccountStatus> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListController<User, AccountStatus> {
        &mut self.list
    }

    pub async fn refresh(&mut self, session: &Session) -> AdminResult<()> {
        self.list.refresh(session).await
    }

    /// Details of the last user successfully opened
    pub fn selected(&self) -> Option<&UserDetails> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// Fetch a user with their orders; on failure the previous selection stays
    pub async fn open(&mut self, session: &Session, user_id: &str) -> AdminResult<&UserDetails> {
        let _loading = self.loading.acquire();
        let result = self.backend.user_details(session, user_id).await;
        match result {
            Ok(details) => {
                tracing::debug!(
                    user_id = %user_id,
                    orders = details.orders.len(),
                    "user details loaded"
                );
                self.last_error = None;
                let details = self.selected.insert(details);
                Ok(&*details)
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "failed to load user details");
                self.last_error = Some(LastError::from(&err));
                Err(err)
            }
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}

/// Paginated consumers with status/search filters and aggregate counts
pub struct ConsumersController<B: AdminBackend + 'static> {
    backend: Arc<B>,
    list: ListController<Consumer, AccountStatus>,
    stats: Option<ConsumerStats>,
    last_error: Option<LastError>,
}

impl<B: AdminBackend + 'static> ConsumersController<B> {
    pub fn new(backend: Arc<B>, limit: u32) -> Self {
        Self::with_filter(backend, ListFilter::with_limit(limit))
    }

    /// Controller starting from an arbitrary filter; nothing is fetched yet
    pub fn with_filter(backend: Arc<B>, filter: ListFilter<AccountStatus>) -> Self {
        let list = ListController::<Consumer, AccountStatus>::new(backend.clone(), filter);
        Self {
            backend,
            list,
            stats: None,
            last_error: None,
        }
    }

    pub fn list(&self) -> &ListController<Consumer, AccountStatus> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListController<Consumer, AccountStatus> {
        &mut self.list
    }

    pub async fn refresh(&mut self, session: &Session) -> AdminResult<()> {
        self.list.refresh(session).await
    }

    pub fn stats(&self) -> Option<&ConsumerStats> {
        self.stats.as_ref()
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// Refresh the aggregate counts; on failure the last counts stay
    pub async fn load_stats(&mut self, session: &Session) -> AdminResult<ConsumerStats> {
        let result = self.backend.consumer_stats(session).await;
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.last_error = None;
                Ok(stats)
            }
            Err(err) => Err(self.record_failure(err)),
        }
    }

    fn record_failure(&mut self, err: AdminError) -> AdminError {
        tracing::warn!(code = err.error_code(), error = %err, "failed to load consumer stats");
        self.last_error = Some(LastError::from(&err));
        err
    }
}
