//! Orders and their addresses
//!
//! Two payload shapes exist in the wild: a rich one (package details, items,
//! nested addresses) and a flat one (identity, tracking number, status, price,
//! delivery date). Both decode into the single [`Order`] type below; fields
//! the flat shape lacks fall back to their defaults.

use crate::core::status::OrderStatus;
use crate::impl_record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Package size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// Line item of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
}

impl Address {
    /// One-line rendering: "street, city, state postal, country"
    pub fn one_line(&self) -> String {
        let region = [self.state.as_str(), self.postal_code.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        [
            self.street.as_str(),
            self.city.as_str(),
            region.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Where an order is delivered
///
/// Either an inline address entered for this order or the id of a saved
/// address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeliveryAddress {
    Manual(ManualDelivery),
    Saved(String),
}

/// Inline delivery address (`{"type": "manual", "manualAddress": {...}}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualDelivery {
    #[serde(rename = "type")]
    pub kind: DeliveryKind,
    pub manual_address: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    Manual,
}

impl DeliveryAddress {
    pub fn one_line(&self) -> String {
        match self {
            DeliveryAddress::Manual(m) => m.manual_address.one_line(),
            DeliveryAddress::Saved(id) => format!("saved address {}", id),
        }
    }
}

/// An order as listed by the admin endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub tracking_number: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub package_size: PackageSize,
    #[serde(default)]
    pub is_fragile: bool,
    #[serde(default)]
    pub is_express_delivery: bool,
    #[serde(default)]
    pub requires_special_handling: bool,
    pub price: f64,
    #[serde(default)]
    pub estimated_weight: Option<f64>,
    #[serde(default)]
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl_record!(Order, "order", "orders", created_at);

impl Order {
    /// Minimal order in the flat shape; every other field takes its default
    pub fn new(
        id: impl Into<String>,
        tracking_number: impl Into<String>,
        status: OrderStatus,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            tracking_number: tracking_number.into(),
            status,
            package_size: PackageSize::default(),
            is_fragile: false,
            is_express_delivery: false,
            requires_special_handling: false,
            price,
            estimated_weight: None,
            estimated_delivery_date: None,
            special_instructions: None,
            items: Vec::new(),
            pickup_address: None,
            delivery_address: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Body of a status update request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Result of a successful status update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateOutcome {
    pub order: Order,
    /// Whether the backend notified the customer
    #[serde(default)]
    pub email_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_flat_shape() {
        let order: Order = serde_json::from_value(json!({
            "_id": "ord_1",
            "trackingNumber": "TRK-0001",
            "status": "PENDING",
            "price": 12.5,
            "estimatedDeliveryDate": "2025-03-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(order.id, "ord_1");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.package_size, PackageSize::Small);
        assert!(order.items.is_empty());
        assert!(order.delivery_address.is_none());
    }

    #[test]
    fn test_decodes_rich_shape_with_manual_address() {
        let order: Order = serde_json::from_value(json!({
            "_id": "ord_2",
            "userId": "usr_1",
            "trackingNumber": "TRK-0002",
            "status": "IN_TRANSIT",
            "packageSize": "LARGE",
            "isFragile": true,
            "isExpressDelivery": false,
            "requiresSpecialHandling": false,
            "price": 40.0,
            "estimatedWeight": 3.2,
            "estimatedDeliveryDate": "2025-03-01T00:00:00Z",
            "items": [{"_id": "it_1", "name": "Lamp", "quantity": 2}],
            "pickupAddress": {
                "street": "1 Main St", "city": "Lagos", "state": "LA",
                "country": "NG", "postalCode": "100001"
            },
            "deliveryAddress": {
                "type": "manual",
                "manualAddress": {
                    "street": "9 Side Rd", "city": "Ikeja", "state": "LA",
                    "country": "NG", "postalCode": "100271"
                }
            },
            "createdAt": "2025-02-20T10:00:00Z",
            "updatedAt": "2025-02-21T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(order.package_size, PackageSize::Large);
        assert_eq!(order.items[0].quantity, 2);
        match order.delivery_address.unwrap() {
            DeliveryAddress::Manual(m) => assert_eq!(m.manual_address.city, "Ikeja"),
            other => panic!("expected manual address, got {:?}", other),
        }
    }

    #[test]
    fn test_decodes_saved_address_reference() {
        let address: DeliveryAddress = serde_json::from_value(json!("addr_42")).unwrap();
        assert_eq!(address, DeliveryAddress::Saved("addr_42".to_string()));
        assert_eq!(address.one_line(), "saved address addr_42");
    }

    #[test]
    fn test_address_one_line_skips_blanks() {
        let address = Address {
            street: "1 Main St".into(),
            city: "Lagos".into(),
            country: "NG".into(),
            ..Default::default()
        };
        assert_eq!(address.one_line(), "1 Main St, Lagos, NG");
    }

    #[test]
    fn test_outcome_decodes_email_flag() {
        let outcome: StatusUpdateOutcome = serde_json::from_value(json!({
            "order": {
                "_id": "ord_1", "trackingNumber": "T", "status": "CONFIRMED", "price": 1.0
            },
            "emailSent": true
        }))
        .unwrap();
        assert!(outcome.email_sent);
        assert_eq!(outcome.order.status, OrderStatus::Confirmed);
    }
}
