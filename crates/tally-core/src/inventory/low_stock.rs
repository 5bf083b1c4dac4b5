//! # Low-Stock Heap
//!
//! Min-heap of `(quantity, id)` snapshots answering "which k products are
//! running out" without re-sorting the whole inventory.
//!
//! ## Lazy Deletion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stock of Rice goes 100 → 90 → 89:                                      │
//! │                                                                         │
//! │     heap: (89, Rice) (90, Rice) (100, Rice)    ← old snapshots stay     │
//! │                                                                         │
//! │  k_lowest pops in order and asks the inventory for the current stock:   │
//! │     (89, Rice)  current 89 → valid, report it                           │
//! │     (90, Rice)  current 89 → stale, skip                                │
//! │                                                                         │
//! │  Every popped entry is pushed back afterwards, so a read never loses    │
//! │  information and repeated queries give the same answer.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A binary heap cannot lower a key in place, so every stock change pushes a
//! fresh snapshot instead ([`LowStockHeap::observe`]).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::types::ProductId;

/// One observation of a product's stock level.
///
/// Field order gives the heap ordering: quantity first, then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct StockSnapshot {
    quantity: i64,
    id: ProductId,
}

#[derive(Debug, Clone, Default)]
pub struct LowStockHeap {
    heap: BinaryHeap<Reverse<StockSnapshot>>,
}

impl LowStockHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `id` now has `quantity` units. O(log n).
    pub fn observe(&mut self, quantity: i64, id: ProductId) {
        self.heap.push(Reverse(StockSnapshot { quantity, id }));
    }

    /// Returns up to `k` product ids with the lowest current stock, ordered
    /// by stock then id.
    ///
    /// `resolve` reports a product's current stock, or `None` if it is gone.
    /// A snapshot only counts when it matches the current stock, and each
    /// product is reported at most once.
    pub fn k_lowest<F>(&mut self, k: usize, resolve: F) -> Vec<ProductId>
    where
        F: Fn(ProductId) -> Option<i64>,
    {
        let mut popped = Vec::new();
        let mut accepted = Vec::with_capacity(k.min(self.heap.len()));
        let mut seen = HashSet::new();

        while accepted.len() < k {
            let Some(Reverse(snapshot)) = self.heap.pop() else {
                break;
            };
            popped.push(snapshot);

            let current = resolve(snapshot.id);
            if current == Some(snapshot.quantity) && seen.insert(snapshot.id) {
                accepted.push(snapshot.id);
            }
        }

        self.heap.extend(popped.into_iter().map(Reverse));
        accepted
    }

    /// Drops stale snapshots, keeping one current snapshot per live product.
    ///
    /// Returns how many snapshots were removed.
    pub fn compact<F>(&mut self, resolve: F) -> usize
    where
        F: Fn(ProductId) -> Option<i64>,
    {
        let before = self.heap.len();
        let mut seen = HashSet::new();
        let kept: Vec<_> = std::mem::take(&mut self.heap)
            .into_vec()
            .into_iter()
            .filter(|Reverse(s)| resolve(s.id) == Some(s.quantity) && seen.insert(s.id))
            .collect();
        self.heap = BinaryHeap::from(kept);
        before - self.heap.len()
    }

    /// Number of snapshots held, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
