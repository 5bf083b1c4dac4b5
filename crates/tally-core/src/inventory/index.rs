//! # Product Index
//!
//! Owns every product record. Two views over the same records:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  slots:  [ Rice ][ Salt ][ Sugar ][ Tea ]    insertion order, append    │
//! │             ▲       ▲       ▲        ▲                                  │
//! │  by_id:  {1 → 0, 7 → 1, 3 → 2, 9 → 3}        O(1) lookup                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Slots are never removed, so a slot index handed out in `by_id` stays
//! valid for the life of the index.

use std::collections::HashMap;

use crate::types::{Product, ProductId};

#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    slots: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl ProductIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `product` unless its id is already present.
    ///
    /// Returns `false` and leaves the index untouched on a duplicate id.
    pub fn add(&mut self, product: Product) -> bool {
        if self.by_id.contains_key(&product.id) {
            return false;
        }
        self.by_id.insert(product.id, self.slots.len());
        self.slots.push(product);
        true
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).and_then(|&slot| self.slots.get(slot))
    }

    /// Mutable handle for in-place edits. Only the inventory gets one, so
    /// quantity changes cannot bypass the low-stock heap.
    pub(crate) fn find_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        match self.by_id.get(&id) {
            Some(&slot) => self.slots.get_mut(slot),
            None => None,
        }
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Snapshot of all products in insertion order.
    pub fn list_ordered(&self) -> Vec<Product> {
        self.slots.clone()
    }

    /// Borrowing traversal in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> + '_ {
        self.slots.iter()
    }

    /// Overwrites the stock level of `id`. Unknown ids are ignored: callers
    /// have always looked the product up first.
    pub(crate) fn set_quantity(&mut self, id: ProductId, new_qty: i64) {
        if let Some(product) = self.find_mut(id) {
            product.quantity = new_qty;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: u64, name: &str, qty: i64) -> Product {
        Product::new(id, name, Money::from_cents(100), qty)
    }

    #[test]
    fn test_add_and_find() {
        let mut index = ProductIndex::new();
        assert!(index.add(product(7, "Salt", 10)));
        assert!(index.add(product(1, "Rice", 5)));

        assert_eq!(index.len(), 2);
        assert_eq!(index.find(ProductId::new(1)).map(|p| p.name.as_str()), Some("Rice"));
        assert!(index.find(ProductId::new(99)).is_none());
        assert!(index.contains(ProductId::new(7)));
    }

    #[test]
    fn test_duplicate_id_rejected_without_mutation() {
        let mut index = ProductIndex::new();
        assert!(index.add(product(1, "Rice", 5)));
        assert!(!index.add(product(1, "Other Rice", 50)));

        assert_eq!(index.len(), 1);
        let rice = index.find(ProductId::new(1)).unwrap();
        assert_eq!(rice.name, "Rice");
        assert_eq!(rice.quantity, 5);
    }

    #[test]
    fn test_list_ordered_keeps_insertion_order() {
        let mut index = ProductIndex::new();
        for (id, name) in [(9, "Tea"), (3, "Sugar"), (5, "Oil")] {
            index.add(product(id, name, 1));
        }

        let ids: Vec<u64> = index.list_ordered().iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![9, 3, 5]);
        assert_eq!(index.iter().count(), 3);
    }

    #[test]
    fn test_set_quantity_in_place() {
        let mut index = ProductIndex::new();
        index.add(product(1, "Rice", 5));

        index.set_quantity(ProductId::new(1), 42);
        assert_eq!(index.find(ProductId::new(1)).unwrap().quantity, 42);

        // unknown id is a silent no-op
        index.set_quantity(ProductId::new(2), 10);
        assert_eq!(index.len(), 1);
    }
}
