//! # Validation Module
//!
//! Input checks for product records, run before anything is stocked.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Presentation (forms)                                          │
//! │  ├── Parsing text into numbers                                          │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Name present, price and stock within bounds                        │
//! │  ├── Discount rates at most 100%                                        │
//! │  └── Called by Inventory::add_product                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine invariants (duplicate ids, stock bounds)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_product_name("Rice").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{DiscountRate, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name accepted.
pub const MAX_NAME_LEN: usize = 200;

/// Highest unit price accepted, in minor units (100,000,000.00).
///
/// With [`MAX_STOCK`] this keeps any single cart line below 10^16 minor
/// units, so a line total always fits in `i64`.
pub const MAX_PRICE_CENTS: i64 = 10_000_000_000;

/// Most units of one product the shelf can hold.
pub const MAX_STOCK: i64 = 1_000_000;

/// 100% in basis points.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Validates a product name: non-blank, at most [`MAX_NAME_LEN`] characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items), anything above
/// [`MAX_PRICE_CENTS`] is not.
///
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(0)).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level. An empty shelf (zero) is allowed.
pub fn validate_stock(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates a requested quantity (must be > 0).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount rate: at most [`MAX_DISCOUNT_BPS`].
pub fn validate_discount_rate(rate: DiscountRate) -> ValidationResult<()> {
    if rate.bps() > MAX_DISCOUNT_BPS {
        return Err(ValidationError::OutOfRange {
            field: "discount rate (bps)".to_string(),
            min: 0,
            max: i64::from(MAX_DISCOUNT_BPS),
        });
    }

    Ok(())
}

/// Runs every product check, name first.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price(product.price)?;
    validate_stock(product.quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================
