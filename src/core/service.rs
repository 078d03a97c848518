//! Service traits for the admin backend

use crate::core::error::AdminResult;
use crate::core::query::{ListFilter, Page};
use crate::core::session::Session;
use crate::core::status::OrderStatus;
use crate::entities::{
    AccountStatus, Consumer, ConsumerStats, LoginCredentials, Order, StatusUpdateOutcome, User,
    UserDetails, Zone, ZonePayload,
};
use async_trait::async_trait;

/// Operations the admin backend exposes
///
/// Implementations are agnostic to transport. [`HttpBackend`] talks to the
/// REST API; [`InMemoryBackend`] keeps everything in process for tests and
/// offline runs. Every call except `login` is authorized by an explicit
/// session.
///
/// [`HttpBackend`]: crate::client::HttpBackend
/// [`InMemoryBackend`]: crate::storage::InMemoryBackend
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// Exchange credentials for a session
    async fn login(&self, credentials: &LoginCredentials) -> AdminResult<Session>;

    /// One page of orders matching the filter
    async fn list_orders(
        &self,
        session: &Session,
        filter: &ListFilter<OrderStatus>,
    ) -> AdminResult<Page<Order>>;

    /// Move an order to `status`
    ///
    /// The backend is the authority on whether the move is legal; it rejects
    /// repeats and out-of-order moves.
    async fn update_order_status(
        &self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> AdminResult<StatusUpdateOutcome>;

    /// All zones
    async fn list_zones(&self, session: &Session) -> AdminResult<Vec<Zone>>;

    /// Create a zone; the backend assigns the identity
    async fn create_zone(&self, session: &Session, payload: &ZonePayload) -> AdminResult<Zone>;

    /// Replace a zone's editable fields
    async fn update_zone(
        &self,
        session: &Session,
        zone_id: &str,
        payload: &ZonePayload,
    ) -> AdminResult<Zone>;

    /// Delete a zone
    async fn delete_zone(&self, session: &Session, zone_id: &str) -> AdminResult<()>;

    /// One page of users (only `page` and `limit` are honoured)
    async fn list_users(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<User>>;

    /// A user and their orders
    async fn user_details(&self, session: &Session, user_id: &str) -> AdminResult<UserDetails>;

    /// One page of consumers (`page`, `limit`, `status`, `search`)
    async fn list_consumers(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<Consumer>>;

    /// Aggregate consumer counts
    async fn consumer_stats(&self, session: &Session) -> AdminResult<ConsumerStats>;
}

/// Source of pages for a list controller
///
/// Every [`AdminBackend`] is a page source for orders, users and consumers.
#[async_trait]
pub trait PageSource<T: Send + 'static, S: Send + Sync + 'static>: Send + Sync {
    async fn fetch_page(&self, session: &Session, filter: &ListFilter<S>) -> AdminResult<Page<T>>;
}

#[async_trait]
impl<B: AdminBackend> PageSource<Order, OrderStatus> for B {
    async fn fetch_page(
        &self,
        session: &Session,
        filter: &ListFilter<OrderStatus>,
    ) -> AdminResult<Page<Order>> {
        self.list_orders(session, filter).await
    }
}

#[async_trait]
impl<B: AdminBackend> PageSource<User, AccountStatus> for B {
    async fn fetch_page(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<User>> {
        self.list_users(session, filter).await
    }
}

#[async_trait]
impl<B: AdminBackend> PageSource<Consumer, AccountStatus> for B {
    async fn fetch_page(
        &self,
        session: &Session,
        filter: &ListFilter<AccountStatus>,
    ) -> AdminResult<Page<Consumer>> {
        self.list_consumers(session, filter).await
    }
}
