//! Record trait shared by every backend-owned type

use chrono::{DateTime, Utc};

/// Base trait for records owned by the backend.
///
/// Every record carries a backend-assigned string identity (`_id`). The
/// client never mints identities; it only matches on them when resyncing
/// a local list after a mutation.
pub trait Record: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "orders", "zones")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "order", "zone")
    fn resource_name_singular() -> &'static str;

    /// Backend identity
    fn id(&self) -> &str;

    /// Creation timestamp, when the backend reports one
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Replace the record with the same identity, returning whether one matched
pub fn replace_by_id<T: Record>(records: &mut [T], updated: T) -> bool {
    match records.iter_mut().find(|r| r.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Remove the record with identity `id`, returning whether one matched
pub fn remove_by_id<T: Record>(records: &mut Vec<T>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id() != id);
    records.len() != before
}
