//! Backend records: orders, zones, users, consumers and admins

pub mod macros;

pub mod account;
pub mod order;
pub mod zone;

pub use account::{
    AccountStatus, Admin, Consumer, ConsumerPreferences, ConsumerStats, LoginCredentials,
    LoginGrant, User, UserDetails,
};
pub use order::{
    Address, DeliveryAddress, DeliveryKind, ManualDelivery, Order, OrderItem, PackageSize,
    StatusUpdate, StatusUpdateOutcome,
};
pub use zone::{Zone, ZoneDraft, ZoneEdit, ZonePayload};
