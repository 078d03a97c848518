//! Order status progression
//!
//! Orders move along a single linear path:
//! `PENDING → CONFIRMED → READY_FOR_PICKUP → PICKED_UP → IN_TRANSIT → DELIVERED`.
//!
//! [`TRANSITIONS`] is the only place that path is written down. It answers
//! both "which action should be offered for this order" and "may this change
//! be sent at all". `CANCELLED` and `FAILED_DELIVERY` are set by other actors
//! and are never reachable from here.

use crate::core::error::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    ReadyForPickup,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
    FailedDelivery,
}

impl OrderStatus {
    /// Every status, in display order
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::ReadyForPickup,
        OrderStatus::PickedUp,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::FailedDelivery,
    ];

    /// Wire representation (`READY_FOR_PICKUP`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::ReadyForPickup => "READY_FOR_PICKUP",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::FailedDelivery => "FAILED_DELIVERY",
        }
    }

    /// Human label used in filter pickers
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::ReadyForPickup => "Ready for Pickup",
            OrderStatus::PickedUp => "Picked Up",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::FailedDelivery => "Failed Delivery",
        }
    }

    /// No further transition is offered from this status
    pub fn is_terminal(&self) -> bool {
        next_transition(*self).is_none()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for OrderStatus {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One legal step of the progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Action label shown to the operator
    pub label: &'static str,
}

/// The complete progression; any status not listed as `from` is terminal
pub const TRANSITIONS: [Transition; 5] = [
    Transition {
        from: OrderStatus::Pending,
        to: OrderStatus::Confirmed,
        label: "Confirm",
    },
    Transition {
        from: OrderStatus::Confirmed,
        to: OrderStatus::ReadyForPickup,
        label: "Mark Ready",
    },
    Transition {
        from: OrderStatus::ReadyForPickup,
        to: OrderStatus::PickedUp,
        label: "Mark Picked Up",
    },
    Transition {
        from: OrderStatus::PickedUp,
        to: OrderStatus::InTransit,
        label: "Mark In Transit",
    },
    Transition {
        from: OrderStatus::InTransit,
        to: OrderStatus::Delivered,
        label: "Mark Delivered",
    },
];

/// The single action offered for an order in `status`, if any
pub fn next_transition(status: OrderStatus) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| t.from == status)
}

/// Actions to offer for `status` (zero or one)
pub fn available_actions(status: OrderStatus) -> Vec<&'static Transition> {
    next_transition(status).into_iter().collect()
}

/// Check a requested change against the table before it is sent
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
    match next_transition(from) {
        None => Err(TransitionError::Terminal(from)),
        Some(t) if t.to == to => Ok(()),
        Some(t) => Err(TransitionError::NotAllowed {
            from,
            to,
            allowed: t.to,
        }),
    }
}
