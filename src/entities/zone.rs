//! Delivery zones and their create/edit forms

use crate::core::validation::{finite_number, non_blank};
use crate::impl_record;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A named delivery region with a flat delivery price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Flat price; non-negative by convention, not enforced here
    pub delivery_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl_record!(Zone, "zone", "zones");

/// Body sent on zone create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePayload {
    pub name: String,
    pub delivery_price: f64,
    pub description: String,
}

/// The "new zone" form
///
/// Defaults to `{ name: "", deliveryPrice: 0, description: "" }`, which is
/// also what it is cleared back to after a successful create.
#[derive(Debug, Clone, PartialEq, Default, Validate)]
pub struct ZoneDraft {
    #[validate(custom(function = "non_blank", message = "Zone name is required"))]
    pub name: String,

    #[validate(custom(function = "finite_number", message = "Delivery price must be a number"))]
    pub delivery_price: f64,

    pub description: String,
}

impl ZoneDraft {
    pub fn new(
        name: impl Into<String>,
        delivery_price: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            delivery_price,
            description: description.into(),
        }
    }

    /// Whether the form still holds its default values
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_payload(&self) -> ZonePayload {
        ZonePayload {
            name: self.name.trim().to_string(),
            delivery_price: self.delivery_price,
            description: self.description.clone(),
        }
    }
}

/// The "edit zone" form, seeded from an existing zone
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ZoneEdit {
    /// Identity of the zone being edited; submitting without one is a no-op
    pub id: Option<String>,

    #[validate(custom(function = "non_blank", message = "Zone name is required"))]
    pub name: String,

    #[validate(custom(function = "finite_number", message = "Delivery price must be a number"))]
    pub delivery_price: f64,

    pub description: String,
}

impl From<&Zone> for ZoneEdit {
    fn from(zone: &Zone) -> Self {
        Self {
            id: Some(zone.id.clone()),
            name: zone.name.clone(),
            delivery_price: zone.delivery_price,
            description: zone.description.clone().unwrap_or_default(),
        }
    }
}

impl ZoneEdit {
    pub fn to_payload(&self) -> ZonePayload {
        ZonePayload {
            name: self.name.trim().to_string(),
            delivery_price: self.delivery_price,
            description: self.description.clone(),
        }
    }
}
