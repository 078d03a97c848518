//! # Logistics Admin
//!
//! Client library for the administrative back office of a parcel-delivery
//! platform.
//!
//! ## Features
//!
//! - **Orders**: Filtered, paginated listing with a fixed forward-only status workflow
//! - **Zones**: Create, edit and delete delivery zones with client-side validation
//! - **Users & Consumers**: Paginated directories, user drill-down, consumer statistics
//! - **Pluggable Backends**: REST client or in-process store behind one trait
//! - **Fail-Open Views**: A failed request never clears what is already displayed
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use logistics_admin::prelude::*;
//! use std::sync::Arc;
//!
//! let config = AdminConfig::load(None)?;
//! let backend = Arc::new(HttpBackend::new(&config.api)?);
//! let session = backend
//!     .login(&LoginCredentials::new("ops@example.com", "secret"))
//!     .await?;
//!
//! let mut orders = OrdersController::new(backend, config.defaults.page_limit);
//! orders.refresh(&session).await?;
//! orders
//!     .list_mut()
//!     .set_status(&session, Some(OrderStatus::Pending))
//!     .await?;
//!
//! let first = orders.list().items()[0].id.clone();
//! orders.advance(&session, &first).await?; // PENDING -> CONFIRMED
//! ```

pub mod client;
pub mod config;
pub mod controllers;
pub mod core;
pub mod display;
pub mod entities;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::Record,
        error::{AdminError, AdminResult},
        query::{FilterChange, ListFilter, Page, PaginationMeta, compute_next_fetch},
        service::{AdminBackend, PageSource},
        session::{BearerToken, Session},
        status::{OrderStatus, TRANSITIONS, Transition, available_actions, validate_transition},
    };

    // === Entities ===
    pub use crate::entities::{
        AccountStatus, Consumer, ConsumerStats, LoginCredentials, Order, User, UserDetails, Zone,
        ZoneDraft, ZoneEdit,
    };

    // === Controllers ===
    pub use crate::controllers::{
        ConsumersController, LastError, ListController, OrdersController, UsersController,
        ZonesController,
    };

    // === Backends ===
    pub use crate::client::HttpBackend;
    pub use crate::storage::InMemoryBackend;

    // === Config ===
    pub use crate::config::AdminConfig;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
}
