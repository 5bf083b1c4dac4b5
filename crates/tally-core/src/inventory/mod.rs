//! # Inventory
//!
//! The authoritative stock source. Composes a [`ProductIndex`] (records,
//! insertion order, O(1) lookup) with a [`LowStockHeap`] (lowest-stock
//! queries).
//!
//! ## The One Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every stock change goes through Inventory::set_quantity, which         │
//! │  writes the index AND observes the new level on the heap.               │
//! │                                                                         │
//! │     set_quantity(id, q) ──► index.set_quantity(id, q)                   │
//! │                        └──► low_stock.observe(q, id)                    │
//! │                                                                         │
//! │  Nothing outside this module holds a mutable product handle, so the     │
//! │  heap can never miss a change.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use tally_core::inventory::Inventory;
//! use tally_core::money::Money;
//!
//! let mut inventory = Inventory::new();
//! inventory.add(1, "Rice", Money::from_major_minor(50, 0), 100).unwrap();
//! inventory.add(2, "Salt", Money::from_major_minor(20, 0), 3).unwrap();
//!
//! let low = inventory.k_lowest_stock(1);
//! assert_eq!(low[0].name, "Salt");
//! ```

mod index;
mod low_stock;

pub use index::ProductIndex;
pub use low_stock::LowStockHeap;

use tracing::debug;

use crate::error::InventoryError;
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::validate_product;

/// How many products a low-stock alert lists by default.
pub const DEFAULT_LOW_STOCK_COUNT: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    index: ProductIndex,
    low_stock: LowStockHeap,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stocks a new product.
    ///
    /// ## Errors
    /// - [`InventoryError::Validation`] for a blank name, or a price or stock
    ///   outside the bounds in [`crate::validation`]
    /// - [`InventoryError::DuplicateIdentifier`] if the id is taken
    ///
    /// Neither path changes the inventory.
    pub fn add_product(&mut self, product: Product) -> Result<(), InventoryError> {
        validate_product(&product)?;

        let (id, quantity) = (product.id, product.quantity);
        if !self.index.add(product) {
            return Err(InventoryError::DuplicateIdentifier(id));
        }
        self.low_stock.observe(quantity, id);

        debug!(product_id = %id, quantity, "Product added");
        Ok(())
    }

    /// Shorthand for [`Inventory::add_product`] from raw fields.
    pub fn add(
        &mut self,
        id: u64,
        name: impl Into<String>,
        price: Money,
        quantity: i64,
    ) -> Result<(), InventoryError> {
        self.add_product(Product::new(id, name, price, quantity))
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.index.find(id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains(id)
    }

    /// Current stock of `id`, if stocked.
    pub fn quantity(&self, id: ProductId) -> Option<i64> {
        self.index.find(id).map(|p| p.quantity)
    }

    pub fn list_ordered(&self) -> Vec<Product> {
        self.index.list_ordered()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> + '_ {
        self.index.iter()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The `k` products with the lowest stock, ties broken by id.
    pub fn k_lowest_stock(&mut self, k: usize) -> Vec<Product> {
        let index = &self.index;
        self.low_stock
            .k_lowest(k, |id| index.find(id).map(|p| p.quantity))
            .into_iter()
            .filter_map(|id| index.find(id).cloned())
            .collect()
    }

    /// Discards stale low-stock snapshots. Returns how many were dropped.
    pub fn compact_low_stock(&mut self) -> usize {
        let index = &self.index;
        let dropped = self
            .low_stock
            .compact(|id| index.find(id).map(|p| p.quantity));
        debug!(dropped, remaining = self.low_stock.len(), "Low-stock heap compacted");
        dropped
    }

    /// Number of heap snapshots, stale ones included.
    pub fn low_stock_snapshots(&self) -> usize {
        self.low_stock.len()
    }

    /// Overwrites the stock of `id` and records it on the heap. Unknown ids
    /// are ignored.
    pub(crate) fn set_quantity(&mut self, id: ProductId, new_qty: i64) {
        if !self.index.contains(id) {
            return;
        }
        self.index.set_quantity(id, new_qty);
        self.low_stock.observe(new_qty, id);
    }

    /// Takes `qty` units off the shelf. Returns the new stock, or `None` if
    /// `id` is unknown. Callers check availability first.
    pub(crate) fn deduct(&mut self, id: ProductId, qty: i64) -> Option<i64> {
        let new_qty = self.quantity(id)? - qty;
        self.set_quantity(id, new_qty);
        Some(new_qty)
    }

    /// Puts `qty` units back on the shelf. Returns the new stock, or `None`
    /// if `id` is unknown.
    pub(crate) fn restock(&mut self, id: ProductId, qty: i64) -> Option<i64> {
        let new_qty = self.quantity(id)? + qty;
        self.set_quantity(id, new_qty);
        Some(new_qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
