//! Orders view: filtered listing plus status transitions

use crate::controllers::LastError;
use crate::controllers::list::ListController;
use crate::core::entity::Record;
use crate::core::error::{AdminError, AdminResult, TransitionError};
use crate::core::query::ListFilter;
use crate::core::service::AdminBackend;
use crate::core::session::Session;
use crate::core::status::{OrderStatus, Transition, next_transition, validate_transition};
use crate::entities::{Order, StatusUpdateOutcome};
use std::sync::Arc;

/// Controller for the orders listing
pub struct OrdersController<B: AdminBackend + 'static> {
    backend: Arc<B>,
    list: ListController<Order, OrderStatus>,
    last_error: Option<LastError>,
}

impl<B: AdminBackend + 'static> OrdersController<B> {
    pub fn new(backend: Arc<B>, limit: u32) -> Self {
        Self::with_filter(backend, ListFilter::with_limit(limit))
    }

    /// Controller starting from an arbitrary filter; nothing is fetched yet
    pub fn with_filter(backend: Arc<B>, filter: ListFilter<OrderStatus>) -> Self {
        let list = ListController::<Order, OrderStatus>::new(backend.clone(), filter);
        Self {
            backend,
            list,
            last_error: None,
        }
    }

    pub fn list(&self) -> &ListController<Order, OrderStatus> {
        &self.list
    }

    /// Filter and navigation go through the inner list controller
    pub fn list_mut(&mut self) -> &mut ListController<Order, OrderStatus> {
        &mut self.list
    }

    /// Last failed status update, if the most recent one failed
    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    pub async fn refresh(&mut self, session: &Session) -> AdminResult<()> {
        self.list.refresh(session).await
    }

    /// The action to offer for a displayed order
    pub fn available_action(&self, order_id: &str) -> Option<&'static Transition> {
        self.list
            .find(order_id)
            .and_then(|order| next_transition(order.status))
    }

    /// Move a displayed order to `status`
    ///
    /// The change is checked against the transition table before anything
    /// is sent. On success the listing is refetched so it reflects the
    /// backend; a failed refetch is recorded on the list but does not undo
    /// the update.
    pub async fn transition(
        &mut self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> AdminResult<StatusUpdateOutcome> {
        let current = self.displayed_status(order_id)?;
        if let Err(err) = validate_transition(current, status) {
            return Err(self.record_failure(order_id, err.into()));
        }

        let result = self
            .backend
            .update_order_status(session, order_id, status)
            .await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.record_failure(order_id, err)),
        };

        tracing::info!(
            order_id = %order_id,
            from = %current,
            to = %outcome.order.status,
            email_sent = outcome.email_sent,
            "order status updated"
        );
        self.last_error = None;

        if self.list.refresh(session).await.is_err() {
            tracing::debug!(order_id = %order_id, "listing left stale after status update");
        }
        Ok(outcome)
    }

    /// Apply the single action offered for a displayed order
    pub async fn advance(
        &mut self,
        session: &Session,
        order_id: &str,
    ) -> AdminResult<StatusUpdateOutcome> {
        let current = self.displayed_status(order_id)?;
        let Some(step) = next_transition(current) else {
            let err = TransitionError::Terminal(current).into();
            return Err(self.record_failure(order_id, err));
        };
        self.transition(session, order_id, step.to).await
    }

    fn displayed_status(&self, order_id: &str) -> AdminResult<OrderStatus> {
        self.list
            .find(order_id)
            .map(|order| order.status)
            .ok_or_else(|| AdminError::not_found(Order::resource_name_singular(), order_id))
    }

    fn record_failure(&mut self, order_id: &str, err: AdminError) -> AdminError {
        tracing::warn!(
            order_id = %order_id,
            code = err.error_code(),
            error = %err,
            "order status update failed"
        );
        self.last_error = Some(LastError::from(&err));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryBackend;

    async fn setup(orders: &[(&str, OrderStatus)]) -> (Arc<InMemoryBackend>, Session) {
        let backend = Arc::new(InMemoryBackend::new());
        for (id, status) in orders {
            backend
                .insert_order(Order::new(*id, format!("TRK-{id}"), *status, 10.0))
                .unwrap();
        }
        let session = backend.issue_session().unwrap();
        (backend, session)
    }

    #[tokio::test]
    async fn test_available_action_follows_table() {
        let (backend, session) = setup(&[
            ("a", OrderStatus::Pending),
            ("b", OrderStatus::InTransit),
            ("c", OrderStatus::Delivered),
        ])
        .await;
        let mut orders = OrdersController::new(backend, 10);
        orders.refresh(&session).await.unwrap();

        assert_eq!(orders.available_action("a").unwrap().label, "Confirm");
        assert_eq!(orders.available_action("b").unwrap().to, OrderStatus::Delivered);
        assert!(orders.available_action("c").is_none());
        assert!(orders.available_action("missing").is_none());
    }

    #[tokio::test]
    async fn test_advance_updates_and_refetches() {
        let (backend, session) = setup(&[("a", OrderStatus::Pending)]).await;
        let mut orders = OrdersController::new(backend.clone(), 10);
        orders.refresh(&session).await.unwrap();

        let outcome = orders.advance(&session, "a").await.unwrap();
        assert_eq!(outcome.order.status, OrderStatus::Confirmed);
        assert_eq!(backend.order("a").unwrap().status, OrderStatus::Confirmed);
        assert_eq!(orders.list().find("a").unwrap().status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_illegal_transition_is_not_sent() {
        let (backend, session) = setup(&[("a", OrderStatus::Pending)]).await;
        let mut orders = OrdersController::new(backend.clone(), 10);
        orders.refresh(&session).await.unwrap();
        let before = backend.request_count();

        let err = orders
            .transition(&session, "a", OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Transition(_)));
        assert_eq!(backend.request_count(), before);
        assert_eq!(orders.last_error().unwrap().code, "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_terminal_order_cannot_advance() {
        let (backend, session) = setup(&[("a", OrderStatus::Cancelled)]).await;
        let mut orders = OrdersController::new(backend, 10);
        orders.refresh(&session).await.unwrap();
        let err = orders.advance(&session, "a").await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Transition(TransitionError::Terminal(OrderStatus::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_listing() {
        let (backend, session) = setup(&[("a", OrderStatus::Pending)]).await;
        let mut orders = OrdersController::new(backend.clone(), 10);
        orders.refresh(&session).await.unwrap();

        backend.set_offline(true);
        assert!(orders.advance(&session, "a").await.is_err());
        assert_eq!(orders.list().find("a").unwrap().status, OrderStatus::Pending);
        assert!(orders.last_error().is_some());
    }
}
