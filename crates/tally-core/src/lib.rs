//! # tally-core: Inventory and Billing for Tally POS
//!
//! Everything a single till needs, held in memory: the product catalogue with
//! live stock levels, the cart, an undo log for reservations, discount slabs
//! and checkout records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally-demo (binary)                          │   │
//! │  │    config ──► seed inventory ──► scripted sale ──► receipt      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │  billing  │  │  receipt  │  │   money   │  │   │
//! │  │   │  index    │  │  cart     │  │  record   │  │   Money   │  │   │
//! │  │   │ low-stock │  │  undo     │  │  render   │  │ Discount  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • SINGLE WRITER            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`inventory`] - Product index and low-stock heap
//! - [`billing`] - Billing engine: cart, undo log, discounts
//! - [`receipt`] - Checkout records and text receipts
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Domain types (Product, ProductId, DiscountRate)
//! - [`error`] - Domain error types
//! - [`validation`] - Product and quantity rules
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{BillingEngine, Inventory, Money, ProductId};
//!
//! let mut inventory = Inventory::new();
//! inventory.add(1, "Rice", Money::from_major_minor(50, 0), 100).unwrap();
//! inventory.add(2, "Salt", Money::from_major_minor(20, 0), 3).unwrap();
//!
//! let mut till = BillingEngine::new(inventory);
//! till.reserve(ProductId::new(1), 2).unwrap();
//! till.undo_last().unwrap();
//!
//! let low = till.inventory_mut().k_lowest_stock(1);
//! assert_eq!(low[0].name, "Salt");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod inventory;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{BillingEngine, DiscountPolicy, ReservationReceipt, Totals};
pub use error::{
    CartError, CheckoutError, CoreError, CoreResult, DiscountError, InventoryError, UndoError,
    ValidationError,
};
pub use inventory::{Inventory, DEFAULT_LOW_STOCK_COUNT};
pub use money::Money;
pub use receipt::{CheckoutRecord, ReceiptDisplay, ReceiptFormat, ReceiptLine};
pub use types::*;
