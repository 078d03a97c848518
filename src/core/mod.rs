//! Core module containing the fundamental traits and types of the admin client

pub mod entity;
pub mod error;
pub mod query;
pub mod service;
pub mod session;
pub mod status;
pub mod validation;

pub use entity::Record;
pub use error::{AdminError, AdminResult};
pub use query::{FilterChange, ListFilter, Page, PaginationMeta, compute_next_fetch};
pub use service::{AdminBackend, PageSource};
pub use session::{BearerToken, Session};
pub use status::{OrderStatus, Transition, TRANSITIONS};
