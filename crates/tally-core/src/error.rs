//! # Error Types
//!
//! Domain error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  InventoryError   - add_product rejections                              │
//! │  CartError        - reservation rejections                              │
//! │  UndoError        - nothing (left) to undo                              │
//! │  CheckoutError    - checkout of an empty cart                           │
//! │  DiscountError    - malformed discount slabs                            │
//! │  ValidationError  - malformed product input                             │
//! │                                                                         │
//! │  CoreError        - umbrella for callers that use `?` across them       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable by the caller. Operations that return one
//! of these errors have not mutated any state.

use thiserror::Error;

use crate::money::Money;
use crate::types::ProductId;

// =============================================================================
// Inventory Errors
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// A product with this identifier is already stocked.
    ///
    /// The caller keeps its input and may retry with another id.
    #[error("Product ID {0} already exists")]
    DuplicateIdentifier(ProductId),

    #[error("Invalid product: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Cart Errors
// =============================================================================

/// Reasons a reservation is rejected.
///
/// ## Check Order
/// ```text
/// reserve(id, qty)
///      │
///      ├── id unknown?          → NotFound
///      ├── qty <= 0?            → InvalidQuantity
///      ├── qty > stock?         → InsufficientStock
///      └── bill total overflow? → AmountOverflow
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Quantity should be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("Not enough stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        available: i64,
        requested: i64,
    },

    /// The bill would no longer fit in [`Money`].
    #[error("Adding {quantity} of product {product_id} would overflow the bill total")]
    AmountOverflow { product_id: ProductId, quantity: i64 },
}

// =============================================================================
// Undo Errors
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UndoError {
    #[error("Nothing to undo")]
    EmptyUndoLog,

    /// The product an action refers to is no longer stocked.
    ///
    /// Products are never removed today, so this is only reachable if that
    /// changes; the action is dropped rather than half-applied.
    #[error("Product {0} missing from inventory, action dropped")]
    ProductMissing(ProductId),
}

// =============================================================================
// Checkout Errors
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("No items in the cart")]
    EmptyCart,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for product records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is outside the accepted range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Discount Errors
// =============================================================================

/// Reasons a set of discount slabs is rejected.
///
/// Accepted slab sets never discount more than the subtotal, and never
/// lower the rate as the subtotal grows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    #[error("Invalid discount slab: {0}")]
    Validation(#[from] ValidationError),

    #[error("Two slabs start above {0}")]
    DuplicateThreshold(Money),

    /// A higher threshold offers a lower rate than a lower one.
    #[error("Slab above {above} offers less than a lower slab")]
    DecreasingRate { above: Money },
}

// =============================================================================
// Core Error
// =============================================================================

/// Any error the core can produce.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Undo(#[from] UndoError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
