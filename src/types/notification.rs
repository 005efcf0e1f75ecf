//! Notification entries owned by the merge engine

use serde::{Deserialize, Serialize};

use super::ProductSnapshot;

/// One entry of the live notification list.
///
/// There is at most one notification per product; it summarizes the latest
/// pushed state plus the user's read acknowledgment. Entries are created and
/// mutated exclusively by [`NotificationList`](crate::notifications::NotificationList).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Stable identity for rendering and removal, unique per
    /// (product id, batch timestamp) pair. A stock change mints a new id;
    /// a metadata-only refresh keeps the old one.
    pub id: String,

    /// The product this entry tracks.
    pub product_id: i64,

    /// Mirrored product code.
    pub code: String,

    /// Mirrored display name.
    pub name: String,

    /// Latest known stock level.
    pub stock: i64,

    /// Latest known low-stock threshold.
    pub min_threshold: i64,

    /// Latest known unit price.
    pub price: f64,

    /// Batch time of the most recent update affecting this entry.
    pub timestamp: String,

    /// User acknowledgment flag.
    pub read: bool,

    /// True only when the most recent update changed `stock`.
    /// A rendering hint, never identity.
    pub changed: bool,
}

impl Notification {
    /// Build a fresh unread entry from a snapshot.
    pub(crate) fn from_snapshot(snapshot: &ProductSnapshot, timestamp: &str) -> Self {
        Self {
            id: Self::make_id(snapshot.id, timestamp),
            product_id: snapshot.id,
            code: snapshot.code.clone(),
            name: snapshot.name.clone(),
            stock: snapshot.stock,
            min_threshold: snapshot.min_threshold,
            price: snapshot.price,
            timestamp: timestamp.to_string(),
            read: false,
            changed: true,
        }
    }

    pub(crate) fn make_id(product_id: i64, timestamp: &str) -> String {
        format!("{}-{}", product_id, timestamp)
    }
}
