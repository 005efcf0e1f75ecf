//! Notification merge engine
//!
//! Folds incoming batches of product snapshots into a bounded, ordered,
//! read/unread notification list. The engine is a plain synchronous state
//! container: the stream side applies batches, the consumer side applies
//! acknowledgments, and every operation is one discrete step.
//!
//! ## Invariants
//!
//! - At most one entry per product id.
//! - Newest-affecting-event first; the list never exceeds
//!   [`MAX_NOTIFICATIONS`] entries after a batch (oldest entries evicted).
//! - Position changes only when a product's stock changes (move to front)
//!   or a new product appears (insert at front). A metadata-only refresh
//!   mutates the entry in place and leaves `read` alone.
//! - Entries are destroyed only by explicit removal, clearing, or bounded
//!   eviction - never by reconnects or the passage of time.

use crate::types::{Notification, ProductSnapshot};

/// Upper bound on live notifications; older entries are evicted past this.
pub const MAX_NOTIFICATIONS: usize = 50;

/// The bounded, ordered notification list.
#[derive(Debug, Default)]
pub struct NotificationList {
    entries: Vec<Notification>,
}

impl NotificationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one batch of snapshots into the list.
    ///
    /// Snapshots are processed in server order, each seeing the effect of
    /// the previous one - a product appearing twice in one batch is merged
    /// twice, and its final position reflects the last stock comparison.
    /// The list is truncated to [`MAX_NOTIFICATIONS`] once per batch.
    pub fn apply_batch(&mut self, snapshots: &[ProductSnapshot], timestamp: &str) {
        for snapshot in snapshots {
            self.apply_snapshot(snapshot, timestamp);
        }
        self.entries.truncate(MAX_NOTIFICATIONS);
    }

    fn apply_snapshot(&mut self, snapshot: &ProductSnapshot, timestamp: &str) {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.product_id == snapshot.id);

        match position {
            None => {
                self.entries
                    .insert(0, Notification::from_snapshot(snapshot, timestamp));
            }
            Some(index) if self.entries[index].stock != snapshot.stock => {
                // Stock moved: refresh everything, drop the read mark and
                // bring the entry to the front under a new identity.
                let mut entry = self.entries.remove(index);
                entry.id = Notification::make_id(snapshot.id, timestamp);
                entry.code = snapshot.code.clone();
                entry.name = snapshot.name.clone();
                entry.stock = snapshot.stock;
                entry.min_threshold = snapshot.min_threshold;
                entry.price = snapshot.price;
                entry.timestamp = timestamp.to_string();
                entry.read = false;
                entry.changed = true;
                self.entries.insert(0, entry);
            }
            Some(index) => {
                // Same stock: metadata refresh in place, position and read
                // state untouched.
                let entry = &mut self.entries[index];
                entry.code = snapshot.code.clone();
                entry.name = snapshot.name.clone();
                entry.min_threshold = snapshot.min_threshold;
                entry.price = snapshot.price;
                entry.timestamp = timestamp.to_string();
                entry.changed = false;
            }
        }
    }

    /// Acknowledge one entry by id. No-op if absent; never reorders.
    pub fn mark_as_read(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.read = true;
            entry.changed = false;
        }
    }

    /// Delete one entry by id. No-op if absent.
    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Empty the list.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Unacknowledged entry count, derived on every call.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.read).count()
    }

    /// The entries, newest-affecting-event first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i64, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            id,
            code: format!("SKU-{}", id),
            name: format!("Product {}", id),
            price: 10.0,
            stock,
            min_threshold: 5,
            notifier_flag: true,
        }
    }

    #[test]
    fn test_new_product_inserts_unread_at_front() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 10)], "t1");

        assert_eq!(list.len(), 1);
        let entry = &list.entries()[0];
        assert_eq!(entry.product_id, 1);
        assert_eq!(entry.stock, 10);
        assert!(!entry.read);
        assert!(entry.changed);
        assert_eq!(list.unread_count(), 1);
    }

    #[test]
    fn test_unchanged_stock_refreshes_in_place() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 10)], "t1");
        let id = list.entries()[0].id.clone();
        list.mark_as_read(&id);

        let mut refresh = snapshot(1, 10);
        refresh.price = 12.5;
        list.apply_batch(&[refresh], "t2");

        let entry = &list.entries()[0];
        assert_eq!(entry.id, id, "metadata refresh keeps identity");
        assert_eq!(entry.price, 12.5);
        assert_eq!(entry.timestamp, "t2");
        assert!(entry.read, "read survives a metadata refresh");
        assert!(!entry.changed);
    }

    #[test]
    fn test_stock_change_resets_read_and_moves_to_front() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 10), snapshot(2, 20)], "t1");
        // Entry for product 1 is now at index 1.
        let old_id = list.entries()[1].id.clone();
        list.mark_as_read(&old_id);

        list.apply_batch(&[snapshot(1, 7)], "t2");

        let entry = &list.entries()[0];
        assert_eq!(entry.product_id, 1);
        assert_eq!(entry.stock, 7);
        assert!(!entry.read, "stock change flips read back");
        assert!(entry.changed);
        assert_ne!(entry.id, old_id, "stock change mints a new id");
        assert_eq!(list.entries()[1].product_id, 2);
    }

    #[test]
    fn test_identical_batch_twice_is_idempotent_for_read() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 10)], "t1");
        let id = list.entries()[0].id.clone();
        list.mark_as_read(&id);

        list.apply_batch(&[snapshot(1, 10)], "t1");

        assert!(list.entries()[0].read);
        assert!(!list.entries()[0].changed);
        assert_eq!(list.unread_count(), 0);
    }

    #[test]
    fn test_at_most_one_entry_per_product() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 10)], "t1");
        list.apply_batch(&[snapshot(1, 9)], "t2");
        list.apply_batch(&[snapshot(1, 8)], "t3");

        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].stock, 8);
    }

    #[test]
    fn test_same_product_twice_in_one_batch_processed_in_order() {
        let mut list = NotificationList::new();
        // Second occurrence sees the first one's effect: stock 10 -> 10 is
        // "unchanged", so the entry ends up changed=false but still unread
        // from its creation.
        list.apply_batch(&[snapshot(1, 10), snapshot(1, 10)], "t1");
        assert_eq!(list.len(), 1);
        assert!(!list.entries()[0].changed);
        assert!(!list.entries()[0].read);

        // And a final differing quantity wins the position and flags.
        list.apply_batch(&[snapshot(2, 5)], "t2");
        list.apply_batch(&[snapshot(1, 10), snapshot(1, 3)], "t3");
        assert_eq!(list.entries()[0].product_id, 1);
        assert!(list.entries()[0].changed);
        assert_eq!(list.entries()[0].stock, 3);
    }

    #[test]
    fn test_truncates_to_bound_evicting_tail() {
        let mut list = NotificationList::new();
        let batch: Vec<_> = (0..60).map(|i| snapshot(i, i)).collect();
        list.apply_batch(&batch, "t1");

        assert_eq!(list.len(), MAX_NOTIFICATIONS);
        // Insert-at-front means the last snapshot of the batch is newest.
        assert_eq!(list.entries()[0].product_id, 59);
        // The oldest survivors are the tail; products 0..=9 were evicted.
        assert_eq!(list.entries()[MAX_NOTIFICATIONS - 1].product_id, 10);
    }

    #[test]
    fn test_mark_as_read_does_not_reorder() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 1), snapshot(2, 2), snapshot(3, 3)], "t1");
        let middle_id = list.entries()[1].id.clone();

        list.mark_as_read(&middle_id);

        assert_eq!(list.entries()[1].id, middle_id);
        assert!(list.entries()[1].read);
        assert_eq!(list.unread_count(), 2);
    }

    #[test]
    fn test_mark_as_read_unknown_id_is_noop() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 1)], "t1");
        list.mark_as_read("nope");
        assert_eq!(list.unread_count(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut list = NotificationList::new();
        list.apply_batch(&[snapshot(1, 1), snapshot(2, 2)], "t1");

        let id = list.entries()[0].id.clone();
        list.remove(&id);
        assert_eq!(list.len(), 1);

        list.remove("already-gone");
        assert_eq!(list.len(), 1);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.unread_count(), 0);
    }

    #[test]
    fn test_no_duplicate_product_ids_after_mixed_batches() {
        let mut list = NotificationList::new();
        for round in 0..20 {
            let batch: Vec<_> = (0..10).map(|i| snapshot(i, (round + i) % 4)).collect();
            list.apply_batch(&batch, &format!("t{}", round));

            let mut seen = std::collections::HashSet::new();
            for entry in list.entries() {
                assert!(seen.insert(entry.product_id), "duplicate product id");
            }
            assert!(list.len() <= MAX_NOTIFICATIONS);
        }
    }
}
