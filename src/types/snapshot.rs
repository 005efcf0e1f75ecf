//! Product snapshot wire type

use serde::{Deserialize, Serialize};

/// Latest observed state of a tracked product as reported by the server.
///
/// Snapshots are server-owned: the client never mutates them, it only folds
/// them into [`Notification`](crate::types::Notification) entries. The wire
/// format uses camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Server-side product identity.
    pub id: i64,

    /// Short product code (SKU).
    #[serde(default)]
    pub code: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Current unit price.
    #[serde(default)]
    pub price: f64,

    /// Units currently in stock - the tracked quantity.
    pub stock: i64,

    /// Stock level below which the product is considered low.
    #[serde(default)]
    pub min_threshold: i64,

    /// Whether the server has notifications enabled for this product.
    #[serde(default)]
    pub notifier_flag: bool,
}
