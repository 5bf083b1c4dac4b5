//! # Domain Types
//!
//! Core domain types shared by the inventory and billing engines.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    ProductId    │   │    Product      │   │  DiscountRate   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  u64, stable    │   │  id             │   │  bps (u32)      │        │
//! │  │  never reused   │   │  name           │   │  1000 = 10%     │        │
//! │  └─────────────────┘   │  price (Money)  │   └─────────────────┘        │
//! │                        │  quantity (i64) │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product's identity (`id`, `name`, `price`) is fixed once it enters the
//! inventory; only `quantity` moves, and only through
//! [`Inventory`](crate::inventory::Inventory).

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Identifier
// =============================================================================

/// Caller-assigned product identifier (the number printed on the shelf tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductId(pub u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: ProductId,

    /// Display name shown on the cart view and receipt.
    pub name: String,

    /// Unit price in the minor currency unit.
    pub price: Money,

    /// Units currently on the shelf (never negative).
    pub quantity: i64,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, price: Money, quantity: i64) -> Self {
        Product {
            id: ProductId(id),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Price of `qty` units at the current unit price.
    #[inline]
    pub fn line_total(&self, qty: i64) -> Money {
        self.price.multiply_quantity(qty)
    }

    /// Whether `qty` units can be taken off the shelf.
    #[inline]
    pub fn can_reserve(&self, qty: i64) -> bool {
        qty <= self.quantity
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate in basis points (1 bps = 0.01%).
///
/// 1000 bps = 10%, 500 bps = 5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a whole percentage.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        DiscountRate(pct * 100)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
