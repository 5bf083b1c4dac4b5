//! # Discount Slabs
//!
//! Bill-level discounts chosen by subtotal. The highest slab whose threshold
//! the subtotal strictly exceeds wins; slabs never stack.
//!
//! ## Default Slabs
//! ```text
//! ┌──────────────────────────────┬───────────┐
//! │ subtotal                     │ discount  │
//! ├──────────────────────────────┼───────────┤
//! │ > 500.00                     │ 10%       │
//! │ > 200.00 and ≤ 500.00        │ 5%        │
//! │ ≤ 200.00                     │ 0%        │
//! └──────────────────────────────┴───────────┘
//! ```
//!
//! Boundaries belong to the lower slab: exactly 500.00 earns 5% and exactly
//! 200.00 earns nothing.
//!
//! ## Accepted Slab Sets
//! - every rate is at most 100%
//! - no two slabs share a threshold
//! - a higher threshold never offers a lower rate
//!
//! Together these keep the total within `[0, subtotal]` and make the rate
//! non-decreasing in the subtotal. Deserialization runs the same checks.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DiscountError;
use crate::money::Money;
use crate::types::DiscountRate;
use crate::validation::validate_discount_rate;

/// Subtotals strictly above `above` earn `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountSlab {
    pub above: Money,
    pub rate: DiscountRate,
}

/// The set of discount slabs in force. Serializes as a bare slab list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DiscountSlab>", into = "Vec<DiscountSlab>")]
pub struct DiscountPolicy {
    slabs: Vec<DiscountSlab>,
}

impl DiscountPolicy {
    /// Builds a policy from slabs given in any order.
    ///
    /// ## Errors
    /// - [`DiscountError::Validation`] for a rate above 100%
    /// - [`DiscountError::DuplicateThreshold`] if two slabs share `above`
    /// - [`DiscountError::DecreasingRate`] if a higher slab pays less
    pub fn new(mut slabs: Vec<DiscountSlab>) -> Result<Self, DiscountError> {
        for slab in &slabs {
            validate_discount_rate(slab.rate)?;
        }

        slabs.sort_by_key(|slab| slab.above);
        for pair in slabs.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            if lower.above == higher.above {
                return Err(DiscountError::DuplicateThreshold(higher.above));
            }
            if higher.rate < lower.rate {
                return Err(DiscountError::DecreasingRate {
                    above: higher.above,
                });
            }
        }

        Ok(DiscountPolicy { slabs })
    }

    /// A policy that never discounts.
    pub fn none() -> Self {
        DiscountPolicy { slabs: Vec::new() }
    }

    /// Slabs ordered by threshold, lowest first.
    pub fn slabs(&self) -> &[DiscountSlab] {
        &self.slabs
    }

    /// Rate of the highest slab `subtotal` qualifies for.
    pub fn rate_for(&self, subtotal: Money) -> DiscountRate {
        self.slabs
            .iter()
            .filter(|slab| subtotal > slab.above)
            .max_by_key(|slab| slab.above)
            .map(|slab| slab.rate)
            .unwrap_or_default()
    }

    /// Discount and total for `subtotal`.
    pub fn apply(&self, subtotal: Money) -> Totals {
        let rate = self.rate_for(subtotal);
        let discount = subtotal.percentage(rate);
        Totals {
            subtotal,
            discount_rate: rate,
            discount,
            total: subtotal - discount,
        }
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        DiscountPolicy {
            slabs: vec![
                DiscountSlab {
                    above: Money::from_major_minor(200, 0),
                    rate: DiscountRate::from_percent(5),
                },
                DiscountSlab {
                    above: Money::from_major_minor(500, 0),
                    rate: DiscountRate::from_percent(10),
                },
            ],
        }
    }
}

impl TryFrom<Vec<DiscountSlab>> for DiscountPolicy {
    type Error = DiscountError;

    fn try_from(slabs: Vec<DiscountSlab>) -> Result<Self, Self::Error> {
        DiscountPolicy::new(slabs)
    }
}

impl From<DiscountPolicy> for Vec<DiscountSlab> {
    fn from(policy: DiscountPolicy) -> Self {
        policy.slabs
    }
}

/// Bill totals at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub discount_rate: DiscountRate,
    pub discount: Money,
    pub total: Money,
}
