//! # Cart
//!
//! Reserved quantities per product, in the order products were first
//! reserved.
//!
//! ## Invariants
//! - At most one line per product (reserving again grows the line)
//! - Quantity is always > 0 (a line that would drop to zero is removed)
//! - Every unit in the cart has already been taken off the shelf
//!
//! The cart stores ids and quantities only. Names and prices are looked up
//! in the inventory when totals or receipts are built, so they always
//! reflect current prices.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::ProductId;

/// One product's reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` to the line for `product_id`, creating it at the end
    /// if absent. Returns the line's new quantity.
    pub(crate) fn add(&mut self, product_id: ProductId, quantity: i64) -> i64 {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity += quantity;
            return line.quantity;
        }

        self.lines.push(CartLine {
            product_id,
            quantity,
        });
        quantity
    }

    /// Takes `quantity` off the line for `product_id`, dropping the line once
    /// nothing is left. Returns what remains (0 when removed), or `None` if
    /// the product is not in the cart.
    pub(crate) fn remove(&mut self, product_id: ProductId, quantity: i64) -> Option<i64> {
        let pos = self.lines.iter().position(|l| l.product_id == product_id)?;
        let remaining = self.lines[pos].quantity - quantity;

        if remaining <= 0 {
            self.lines.remove(pos);
            Some(0)
        } else {
            self.lines[pos].quantity = remaining;
            Some(remaining)
        }
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }

    /// Takes every line out, leaving the cart empty.
    pub(crate) fn drain(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    /// Reserved quantity of `product_id`, if it is in the cart.
    pub fn get(&self, product_id: ProductId) -> Option<i64> {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLine> + '_ {
        self.lines.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}
