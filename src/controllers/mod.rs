//! Stateful controllers behind each admin view
//!
//! Controllers own the last successfully fetched data for a view and the
//! form/filter state around it. Every remote failure leaves that data as it
//! was (fail-open) and is both returned to the caller and remembered as
//! [`LastError`] for display.

pub mod directory;
pub mod list;
pub mod orders;
pub mod zones;

pub use directory::{ConsumersController, UsersController};
pub use list::{ListController, LoadingFlag, LoadingGuard};
pub use orders::OrdersController;
pub use zones::ZonesController;

use crate::core::error::AdminError;
use std::fmt;

/// Most recent failure of a controller, kept for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    /// Stable code from [`AdminError::error_code`]
    pub code: &'static str,
    pub message: String,
}

impl From<&AdminError> for LastError {
    fn from(err: &AdminError) -> Self {
        Self {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation failed: {}", self.message)
    }
}
