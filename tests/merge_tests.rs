//! Merge contract scenarios for the notification list

use std::collections::HashSet;

use stock_notify::{NotificationList, ProductSnapshot, MAX_NOTIFICATIONS};

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

fn assert_invariants(list: &NotificationList) {
    assert!(list.len() <= MAX_NOTIFICATIONS);
    let mut seen = HashSet::new();
    for entry in list.entries() {
        assert!(
            seen.insert(entry.product_id),
            "two entries share product id {}",
            entry.product_id
        );
    }
}

#[test]
fn test_full_read_unread_walkthrough() {
    let mut list = NotificationList::new();

    // A first batch creates one unread entry.
    list.apply_batch(&[snapshot(1, 10)], "t1");
    assert_eq!(list.len(), 1);
    assert_eq!(list.unread_count(), 1);
    assert!(list.entries()[0].changed);
    let id = list.entries()[0].id.clone();

    // Acknowledged.
    list.mark_as_read(&id);
    assert_eq!(list.unread_count(), 0);

    // The same snapshot again: quantity unchanged, so the acknowledgment
    // survives and the entry does not pretend to have changed.
    list.apply_batch(&[snapshot(1, 10)], "t2");
    assert_eq!(list.unread_count(), 0);
    assert!(!list.entries()[0].changed);
    assert_eq!(list.entries()[0].timestamp, "t2");

    // A real stock movement flips it back to unread and to the front.
    list.apply_batch(&[snapshot(2, 99), snapshot(1, 7)], "t3");
    assert_eq!(list.entries()[0].product_id, 1);
    assert!(!list.entries()[0].read);
    assert!(list.entries()[0].changed);
    assert_eq!(list.unread_count(), 2);

    assert_invariants(&list);
}

#[test]
fn test_reordering_only_on_quantity_change() {
    let mut list = NotificationList::new();
    list.apply_batch(&[snapshot(1, 1), snapshot(2, 2), snapshot(3, 3)], "t1");
    let order = |list: &NotificationList| -> Vec<i64> {
        list.entries().iter().map(|n| n.product_id).collect()
    };
    assert_eq!(order(&list), vec![3, 2, 1]);

    // Metadata drift on the middle entry: order untouched.
    let mut refresh = snapshot(2, 2);
    refresh.price = 123.0;
    list.apply_batch(&[refresh], "t2");
    assert_eq!(order(&list), vec![3, 2, 1]);

    // Quantity movement on the tail entry: straight to the front.
    list.apply_batch(&[snapshot(1, 0)], "t3");
    assert_eq!(order(&list), vec![1, 3, 2]);

    assert_invariants(&list);
}

#[test]
fn test_eviction_keeps_the_newest_fifty() {
    let mut list = NotificationList::new();
    for i in 0..MAX_NOTIFICATIONS as i64 {
        list.apply_batch(&[snapshot(i, i)], &format!("t{}", i));
    }
    assert_eq!(list.len(), MAX_NOTIFICATIONS);

    // Touch the oldest entry's stock so it survives the next eviction...
    list.apply_batch(&[snapshot(0, 1000)], "touch");
    assert_eq!(list.entries()[0].product_id, 0);

    // ...then push two brand-new products over the bound.
    list.apply_batch(&[snapshot(900, 1), snapshot(901, 1)], "new");
    assert_eq!(list.len(), MAX_NOTIFICATIONS);
    let ids: HashSet<i64> = list.entries().iter().map(|n| n.product_id).collect();
    assert!(ids.contains(&0), "recently moved entry must not be evicted");
    assert!(ids.contains(&900) && ids.contains(&901));
    assert!(!ids.contains(&1), "the stalest entries go first");
    assert!(!ids.contains(&2));

    assert_invariants(&list);
}

#[test]
fn test_removal_allows_the_product_back_as_new() {
    let mut list = NotificationList::new();
    list.apply_batch(&[snapshot(1, 10)], "t1");
    let id = list.entries()[0].id.clone();
    list.mark_as_read(&id);
    list.remove(&id);
    assert!(list.is_empty());

    // Same product later: a fresh unread entry, no memory of the old one.
    list.apply_batch(&[snapshot(1, 10)], "t2");
    assert_eq!(list.len(), 1);
    assert!(!list.entries()[0].read);
    assert!(list.entries()[0].changed);
}

#[test]
fn test_long_mixed_session_holds_invariants() {
    let mut list = NotificationList::new();
    for round in 0i64..100 {
        let batch: Vec<ProductSnapshot> = (0..8)
            .map(|i| snapshot((round * 3 + i) % 70, (round + i) % 5))
            .collect();
        list.apply_batch(&batch, &format!("t{}", round));
        assert_invariants(&list);
        assert!(list.unread_count() <= list.len());

        if round % 7 == 0 {
            if let Some(entry) = list.entries().first() {
                let id = entry.id.clone();
                list.mark_as_read(&id);
            }
        }
        if round % 13 == 0 {
            if let Some(entry) = list.entries().last() {
                let id = entry.id.clone();
                list.remove(&id);
            }
        }
    }

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.unread_count(), 0);
}
