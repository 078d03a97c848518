//! End-to-end controller scenarios against the in-memory backend
//!
//! These walk the admin views the way an operator would: log in, page
//! through orders, move an order along its workflow, and maintain zones.

use chrono::{Duration, TimeZone, Utc};
use logistics_admin::core::error::{AdminError, HttpError, TransitionError};
use logistics_admin::prelude::*;
use std::sync::Arc;

const ADMIN_EMAIL: &str = "ops@example.com";
const ADMIN_PASSWORD: &str = "correct horse";

/// Backend with `count` orders cycling through the non-terminal statuses
fn seeded_backend(count: usize) -> Arc<InMemoryBackend> {
    let backend = InMemoryBackend::new()
        .with_admin(ADMIN_EMAIL, ADMIN_PASSWORD, "Ops")
        .unwrap();
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    let cycle = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::ReadyForPickup,
        OrderStatus::PickedUp,
        OrderStatus::InTransit,
    ];
    for i in 0..count {
        let mut order = Order::new(
            format!("ord_{i:02}"),
            format!("TRK-{i:04}"),
            cycle[i % cycle.len()],
            10.0 + i as f64,
        );
        order.created_at = Some(base + Duration::days(i as i64));
        backend.insert_order(order).unwrap();
    }
    Arc::new(backend)
}

async fn login(backend: &InMemoryBackend) -> Session {
    backend
        .login(&LoginCredentials::new(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap()
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_and_bad_credentials() {
    let backend = seeded_backend(0);
    let session = login(&backend).await;
    assert_eq!(session.admin().unwrap().name, "Ops");

    let err = backend
        .login(&LoginCredentials::new(ADMIN_EMAIL, "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Http(HttpError { status: 401, .. })));
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let backend = seeded_backend(3);
    let mut orders = OrdersController::new(backend, 10);
    let err = orders
        .refresh(&Session::from_token("forged"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNAUTHORIZED");
    assert!(orders.list().items().is_empty());
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_twenty_three_orders_paginate_into_three_pages() {
    let backend = seeded_backend(23);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend, 10);

    orders.refresh(&session).await.unwrap();
    assert_eq!(orders.list().items().len(), 10);
    assert_eq!(
        *orders.list().pagination(),
        PaginationMeta {
            total: 23,
            page: 1,
            limit: 10,
            pages: 3
        }
    );
    assert!(!orders.list().pagination().has_prev());
    assert!(orders.list().pagination().has_next());

    assert!(orders.list_mut().go_to_page(&session, 3).await.unwrap());
    assert_eq!(orders.list().items().len(), 3);
    assert_eq!(orders.list().pagination().page, 3);
    assert_eq!(orders.list().pagination().display_range(), Some((21, 23)));
    assert!(!orders.list().pagination().has_next());
}

#[tokio::test]
async fn test_go_to_page_beyond_last_is_ignored() {
    let backend = seeded_backend(50);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend.clone(), 10);
    orders.refresh(&session).await.unwrap();
    assert_eq!(orders.list().pagination().pages, 5);

    let requests = backend.request_count();
    assert!(!orders.list_mut().go_to_page(&session, 6).await.unwrap());
    assert_eq!(backend.request_count(), requests);
    assert_eq!(orders.list().pagination().page, 1);
}

#[tokio::test]
async fn test_status_filter_resets_page_from_any_page() {
    let backend = seeded_backend(50);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend, 10);
    orders.refresh(&session).await.unwrap();

    for page in 1..=5 {
        orders.list_mut().go_to_page(&session, page).await.unwrap();
        orders
            .list_mut()
            .set_status(&session, Some(OrderStatus::Pending))
            .await
            .unwrap();
        assert_eq!(orders.list().filter().page, 1, "from page {page}");
        assert_eq!(orders.list().pagination().total, 10);
        orders
            .list_mut()
            .set_status(&session, None)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_date_range_and_search_filters() {
    let backend = seeded_backend(20);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend, 10);
    orders.refresh(&session).await.unwrap();

    let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 3);
    let end = chrono::NaiveDate::from_ymd_opt(2025, 1, 7);
    orders
        .list_mut()
        .set_date_range(&session, start, end)
        .await
        .unwrap();
    assert_eq!(orders.list().pagination().total, 5);

    orders
        .list_mut()
        .set_search(&session, Some("trk-0004".to_string()))
        .await
        .unwrap();
    assert_eq!(orders.list().items().len(), 1);
    assert_eq!(orders.list().items()[0].id, "ord_04");
}

#[tokio::test]
async fn test_offline_backend_keeps_last_page() {
    let backend = seeded_backend(23);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend.clone(), 10);
    orders.refresh(&session).await.unwrap();

    backend.set_offline(true);
    let err = orders.list_mut().go_to_page(&session, 2).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(orders.list().items().len(), 10);
    assert_eq!(orders.list().pagination().page, 1);
    assert!(!orders.list().is_loading());
    assert!(orders.list().last_error().is_some());
}

// =============================================================================
// Status workflow
// =============================================================================

#[tokio::test]
async fn test_confirmed_to_ready_sends_email_and_refetches() {
    let backend = seeded_backend(5);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend.clone(), 10);
    orders.refresh(&session).await.unwrap();

    // ord_01 starts CONFIRMED
    let action = orders.available_action("ord_01").unwrap();
    assert_eq!(action.label, "Mark Ready");

    let outcome = orders
        .transition(&session, "ord_01", OrderStatus::ReadyForPickup)
        .await
        .unwrap();
    assert!(outcome.email_sent);
    assert_eq!(
        orders.list().find("ord_01").unwrap().status,
        OrderStatus::ReadyForPickup
    );
}

#[tokio::test]
async fn test_stale_view_repeat_is_rejected_by_backend() {
    let backend = seeded_backend(5);
    let session = login(&backend).await;

    let mut first = OrdersController::new(backend.clone(), 10);
    let mut second = OrdersController::new(backend.clone(), 10);
    first.refresh(&session).await.unwrap();
    second.refresh(&session).await.unwrap();

    first
        .transition(&session, "ord_01", OrderStatus::ReadyForPickup)
        .await
        .unwrap();

    // The second view still shows CONFIRMED and re-issues the same move
    let err = second
        .transition(&session, "ord_01", OrderStatus::ReadyForPickup)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Http(HttpError { status: 400, .. })));
    assert_eq!(
        second.list().find("ord_01").unwrap().status,
        OrderStatus::Confirmed
    );
    assert_eq!(second.last_error().unwrap().code, "BAD_REQUEST");
}

#[tokio::test]
async fn test_repeat_on_fresh_view_is_rejected_locally() {
    let backend = seeded_backend(5);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend.clone(), 10);
    orders.refresh(&session).await.unwrap();

    orders
        .transition(&session, "ord_01", OrderStatus::ReadyForPickup)
        .await
        .unwrap();
    let requests = backend.request_count();
    let err = orders
        .transition(&session, "ord_01", OrderStatus::ReadyForPickup)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdminError::Transition(TransitionError::NotAllowed { .. })
    ));
    assert_eq!(backend.request_count(), requests);
}

#[tokio::test]
async fn test_advance_walks_to_delivered() {
    let backend = seeded_backend(1);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend.clone(), 10);
    orders.refresh(&session).await.unwrap();

    let mut steps = 0;
    while orders.available_action("ord_00").is_some() {
        orders.advance(&session, "ord_00").await.unwrap();
        steps += 1;
    }
    assert_eq!(steps, 5);
    assert_eq!(backend.order("ord_00").unwrap().status, OrderStatus::Delivered);
    assert!(orders.advance(&session, "ord_00").await.is_err());
}

#[tokio::test]
async fn test_email_flag_reflects_backend() {
    let backend = seeded_backend(1);
    backend.set_send_emails(false);
    let session = login(&backend).await;
    let mut orders = OrdersController::new(backend, 10);
    orders.refresh(&session).await.unwrap();
    let outcome = orders.advance(&session, "ord_00").await.unwrap();
    assert!(!outcome.email_sent);
}

// =============================================================================
// Zones
// =============================================================================

#[tokio::test]
async fn test_create_north_zone() {
    let backend = seeded_backend(0);
    let session = login(&backend).await;
    let mut zones = ZonesController::new(backend.clone());
    zones.load(&session).await.unwrap();

    *zones.draft_mut() = ZoneDraft::new("North", 15.0, "");
    let created = zones.create(&session).await.unwrap();

    assert_eq!(zones.zones().len(), 1);
    assert!(!created.id.is_empty());
    assert_eq!(zones.zones()[0], created);
    assert_eq!(*zones.draft(), ZoneDraft::default());
    assert_eq!(backend.zones().len(), 1);
}

#[tokio::test]
async fn test_zone_edit_lifecycle() {
    let backend = seeded_backend(0);
    let session = login(&backend).await;
    let mut zones = ZonesController::new(backend.clone());
    zones.load(&session).await.unwrap();

    *zones.draft_mut() = ZoneDraft::new("North", 15.0, "");
    let north = zones.create(&session).await.unwrap();
    *zones.draft_mut() = ZoneDraft::new("South", 20.0, "river side");
    zones.create(&session).await.unwrap();

    zones.begin_edit(&north.id).unwrap();
    let edit = zones.editing_mut().unwrap();
    edit.name = "North Central".to_string();
    edit.delivery_price = 17.5;
    let updated = zones.update(&session).await.unwrap().unwrap();

    assert_eq!(updated.id, north.id);
    assert_eq!(zones.zones()[0].name, "North Central");
    assert_eq!(zones.zones()[1].name, "South");

    zones.delete(&session, &north.id).await.unwrap();
    assert_eq!(zones.zones().len(), 1);
    assert_eq!(backend.zones().len(), 1);
}

#[tokio::test]
async fn test_blank_zone_name_sends_nothing() {
    let backend = seeded_backend(0);
    let session = login(&backend).await;
    let mut zones = ZonesController::new(backend.clone());
    let requests = backend.request_count();

    *zones.draft_mut() = ZoneDraft::new("", 15.0, "");
    let err = zones.create(&session).await.unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILURE");
    assert_eq!(backend.request_count(), requests);
}
