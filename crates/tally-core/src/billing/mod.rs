//! # Billing Engine
//!
//! Runs the till: reserves stock into the cart, undoes reservations, prices
//! the bill and completes or cancels the sale.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         BillingEngine                                   │
//! │                                                                         │
//! │  reserve(id, qty) ──┬──► Inventory: stock -= qty  (+ heap observe)      │
//! │                     ├──► Cart:      cart[id] += qty                     │
//! │                     └──► UndoLog:   push Reserve { id, qty }            │
//! │                                                                         │
//! │  undo_last() ───────┬──► UndoLog:   pop                                 │
//! │                     ├──► Inventory: stock += qty  (+ heap observe)      │
//! │                     └──► Cart:      cart[id] -= qty (drop at zero)      │
//! │                                                                         │
//! │  checkout() ────────► CheckoutRecord; cart, log, session cleared;       │
//! │                       stock stays sold                                  │
//! │                                                                         │
//! │  clear_cart() ──────► every line back on the shelf; cart, log,          │
//! │                       session cleared                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single Writer
//! The engine owns its [`Inventory`] and takes `&mut self` for every
//! mutation; there is no internal locking. Share it between threads only
//! behind one `Mutex` around the whole engine.
//!
//! ## Example
//! ```rust
//! use tally_core::billing::BillingEngine;
//! use tally_core::inventory::Inventory;
//! use tally_core::money::Money;
//! use tally_core::ProductId;
//!
//! let mut inventory = Inventory::new();
//! inventory.add(1, "Rice", Money::from_major_minor(50, 0), 100).unwrap();
//!
//! let mut till = BillingEngine::new(inventory);
//! let added = till.reserve(ProductId::new(1), 11).unwrap();
//! assert_eq!(added.to_string(), "Added: Rice x 11 = 550.00");
//!
//! let totals = till.compute_totals();
//! assert_eq!(totals.total, Money::from_major_minor(495, 0));
//!
//! let record = till.checkout().unwrap();
//! assert_eq!(record.lines.len(), 1);
//! assert_eq!(till.inventory().quantity(ProductId::new(1)), Some(89));
//! ```

mod cart;
mod discount;
mod undo;

pub use cart::{Cart, CartLine};
pub use discount::{DiscountPolicy, DiscountSlab, Totals};
pub use undo::{CartAction, UndoLog};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{CartError, CheckoutError, UndoError};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::receipt::{CheckoutRecord, ReceiptLine};
use crate::types::ProductId;
use crate::validation::validate_quantity;

// =============================================================================
// Reservation Receipt
// =============================================================================

/// What a successful reservation added, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReservationReceipt {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

impl fmt::Display for ReservationReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Added: {} x {} = {}", self.name, self.quantity, self.line_total)
    }
}

// =============================================================================
// Billing Session
// =============================================================================

/// Per-sale state that is not stock: who is buying and the last priced totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingSession {
    pub customer_name: String,
    pub totals: Totals,
}

// =============================================================================
// Billing Engine
// =============================================================================

#[derive(Debug, Clone)]
pub struct BillingEngine {
    inventory: Inventory,
    cart: Cart,
    undo: UndoLog,
    session: BillingSession,
    policy: DiscountPolicy,
}

impl BillingEngine {
    /// A till over `inventory` with the default discount slabs.
    pub fn new(inventory: Inventory) -> Self {
        Self::with_policy(inventory, DiscountPolicy::default())
    }

    pub fn with_policy(inventory: Inventory, policy: DiscountPolicy) -> Self {
        BillingEngine {
            inventory,
            cart: Cart::new(),
            undo: UndoLog::new(),
            session: BillingSession::default(),
            policy,
        }
    }

    // -------------------------------------------------------------------------
    // Reservations
    // -------------------------------------------------------------------------

    /// Moves `qty` units of `id` from the shelf into the cart.
    ///
    /// ## Errors
    /// - [`CartError::NotFound`] if `id` is not stocked
    /// - [`CartError::InvalidQuantity`] if `qty <= 0`
    /// - [`CartError::InsufficientStock`] if `qty` exceeds the shelf
    /// - [`CartError::AmountOverflow`] if the bill would no longer fit in [`Money`]
    ///
    /// On error nothing changes.
    pub fn reserve(&mut self, id: ProductId, qty: i64) -> Result<ReservationReceipt, CartError> {
        let product = self.inventory.find(id).ok_or(CartError::NotFound(id))?;
        validate_quantity(qty).map_err(|_| CartError::InvalidQuantity(qty))?;
        if !product.can_reserve(qty) {
            return Err(CartError::InsufficientStock {
                product_id: id,
                name: product.name.clone(),
                available: product.quantity,
                requested: qty,
            });
        }

        let line_total = product
            .price
            .checked_multiply_quantity(qty)
            .filter(|line| self.subtotal().checked_add(*line).is_some())
            .ok_or(CartError::AmountOverflow {
                product_id: id,
                quantity: qty,
            })?;

        let receipt = ReservationReceipt {
            product_id: id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: qty,
            line_total,
        };

        // Validation is done; none of the three steps below can fail.
        let remaining = self.inventory.deduct(id, qty);
        let in_cart = self.cart.add(id, qty);
        self.undo.push(CartAction::Reserve {
            product_id: id,
            quantity: qty,
        });

        debug!(product_id = %id, quantity = qty, ?remaining, in_cart, "Reserved stock");
        Ok(receipt)
    }

    /// Reverses the most recent reservation.
    ///
    /// ## Errors
    /// - [`UndoError::EmptyUndoLog`] when there is nothing left to undo
    pub fn undo_last(&mut self) -> Result<String, UndoError> {
        let action = self.undo.pop().ok_or(UndoError::EmptyUndoLog)?;

        match action {
            CartAction::Reserve {
                product_id,
                quantity,
            } => {
                let Some(name) = self.inventory.find(product_id).map(|p| p.name.clone()) else {
                    warn!(product_id = %product_id, "Undo skipped: product missing");
                    return Err(UndoError::ProductMissing(product_id));
                };

                let stock = self.inventory.restock(product_id, quantity);
                let in_cart = self.cart.remove(product_id, quantity);

                debug!(product_id = %product_id, quantity, ?stock, ?in_cart, "Reservation undone");
                Ok(format!("Undone: returned {quantity} of {name}."))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Sum of current price × reserved quantity over the cart.
    ///
    /// [`BillingEngine::reserve`] refuses any line that would overflow this.
    pub fn subtotal(&self) -> Money {
        self.cart
            .iter()
            .filter_map(|line| {
                self.inventory
                    .find(line.product_id)
                    .map(|p| p.line_total(line.quantity))
            })
            .sum()
    }

    /// Prices the cart at current prices and records the result on the session.
    pub fn compute_totals(&mut self) -> Totals {
        let totals = self.policy.apply(self.subtotal());
        self.session.totals = totals;
        totals
    }

    /// Cart lines with names and current prices, in cart order.
    pub fn cart_view(&self) -> Vec<ReceiptLine> {
        self.cart
            .iter()
            .filter_map(|line| {
                let product = self.inventory.find(line.product_id)?;
                Some(ReceiptLine {
                    product_id: line.product_id,
                    name: product.name.clone(),
                    quantity: line.quantity,
                    unit_price: product.price,
                    line_total: product.line_total(line.quantity),
                })
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Completing or cancelling the sale
    // -------------------------------------------------------------------------

    /// Completes the sale now. See [`BillingEngine::checkout_at`].
    pub fn checkout(&mut self) -> Result<CheckoutRecord, CheckoutError> {
        self.checkout_at(Utc::now())
    }

    /// Completes the sale, stamping the record with `at`.
    ///
    /// Reserved stock stays deducted. Cart, undo log and session are reset.
    ///
    /// ## Errors
    /// - [`CheckoutError::EmptyCart`] if nothing was reserved
    pub fn checkout_at(&mut self, at: DateTime<Utc>) -> Result<CheckoutRecord, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = self.compute_totals();
        let customer_name = std::mem::take(&mut self.session.customer_name);
        let record = CheckoutRecord::new(customer_name, self.cart_view(), totals, at);

        self.cart.clear();
        self.undo.clear();
        self.session = BillingSession::default();

        info!(
            receipt_number = %record.receipt_number,
            items = record.lines.len(),
            total = %record.total,
            "Checkout complete"
        );
        Ok(record)
    }

    /// Cancels the sale: every cart line goes back on the shelf, then cart,
    /// undo log and session are reset. Returns how many lines were returned.
    pub fn clear_cart(&mut self) -> usize {
        let lines = self.cart.drain();
        for line in &lines {
            self.inventory.restock(line.product_id, line.quantity);
        }
        self.undo.clear();
        self.session = BillingSession::default();

        debug!(lines = lines.len(), "Cart cleared, stock restored");
        lines.len()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// How many undo steps are available.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    pub fn customer_name(&self) -> &str {
        &self.session.customer_name
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.session.customer_name = name.into();
    }

    /// Totals from the last [`BillingEngine::compute_totals`] call.
    pub fn last_totals(&self) -> Totals {
        self.session.totals
    }

    pub fn session(&self) -> &BillingSession {
        &self.session
    }

    pub fn policy(&self) -> &DiscountPolicy {
        &self.policy
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable inventory access for stocking products and low-stock queries.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscountRate;

    fn rupees(major: i64) -> Money {
        Money::from_major_minor(major, 0)
    }

    fn id(n: u64) -> ProductId {
        ProductId::new(n)
    }

    fn till() -> BillingEngine {
        let mut inventory = Inventory::new();
        inventory.add(1, "Rice", rupees(50), 100).unwrap();
        inventory.add(2, "Salt", rupees(20), 5).unwrap();
        inventory.add(3, "Tea", rupees(120), 10).unwrap();
        BillingEngine::new(inventory)
    }

    #[test]
    fn test_reserve_moves_stock_into_cart() {
        let mut till = till();
        let receipt = till.reserve(id(1), 10).unwrap();

        assert_eq!(receipt.name, "Rice");
        assert_eq!(receipt.unit_price, rupees(50));
        assert_eq!(receipt.line_total, rupees(500));
        assert_eq!(till.inventory().quantity(id(1)), Some(90));
        assert_eq!(till.cart().get(id(1)), Some(10));
        assert_eq!(till.undo_depth(), 1);
    }

    #[test]
    fn test_reserve_errors_leave_state_untouched() {
        let mut till = till();
        till.reserve(id(2), 2).unwrap();
        let cart_before = till.cart().clone();

        assert_eq!(till.reserve(id(9), 1), Err(CartError::NotFound(id(9))));
        assert_eq!(till.reserve(id(2), 0), Err(CartError::InvalidQuantity(0)));
        assert_eq!(till.reserve(id(2), -1), Err(CartError::InvalidQuantity(-1)));
        assert_eq!(
            till.reserve(id(2), 4),
            Err(CartError::InsufficientStock {
                product_id: id(2),
                name: "Salt".to_string(),
                available: 3,
                requested: 4,
            })
        );

        assert_eq!(till.cart(), &cart_before);
        assert_eq!(till.inventory().quantity(id(2)), Some(3));
        assert_eq!(till.undo_depth(), 1);
    }

    #[test]
    fn test_unknown_id_reported_before_bad_quantity() {
        let mut till = till();
        assert_eq!(till.reserve(id(9), 0), Err(CartError::NotFound(id(9))));
    }

    #[test]
    fn test_reserve_entire_shelf() {
        let mut till = till();
        till.reserve(id(2), 5).unwrap();
        assert_eq!(till.inventory().quantity(id(2)), Some(0));

        let low = till.inventory_mut().k_lowest_stock(1);
        assert_eq!(low[0].id, id(2));
    }

    #[test]
    fn test_reserve_refuses_bill_overflow() {
        use crate::validation::{MAX_PRICE_CENTS, MAX_STOCK};

        let mut inventory = Inventory::new();
        for n in 1..=1_000 {
            inventory
                .add(n, format!("Bullion {n}"), Money::from_cents(MAX_PRICE_CENTS), MAX_STOCK)
                .unwrap();
        }
        let mut till = BillingEngine::new(inventory);

        // Each full line is 10^16 minor units; 922 of them still fit in i64.
        for n in 1..=922 {
            till.reserve(id(n), MAX_STOCK).unwrap();
        }
        assert_eq!(
            till.reserve(id(923), MAX_STOCK),
            Err(CartError::AmountOverflow {
                product_id: id(923),
                quantity: MAX_STOCK,
            })
        );

        assert_eq!(till.cart().len(), 922);
        assert_eq!(till.undo_depth(), 922);
        assert_eq!(till.inventory().quantity(id(923)), Some(MAX_STOCK));

        let totals = till.compute_totals();
        assert_eq!(totals.subtotal, Money::from_cents(9_220_000_000_000_000_000));
        assert_eq!(totals.total, Money::from_cents(8_298_000_000_000_000_000));
    }

    #[test]
    fn test_undo_unwinds_in_reverse_order() {
        let mut till = till();
        till.reserve(id(1), 10).unwrap();
        till.reserve(id(2), 2).unwrap();
        till.reserve(id(1), 5).unwrap();

        assert_eq!(till.undo_last().unwrap(), "Undone: returned 5 of Rice.");
        assert_eq!(till.cart().get(id(1)), Some(10));
        assert_eq!(till.undo_last().unwrap(), "Undone: returned 2 of Salt.");
        assert_eq!(till.cart().get(id(2)), None);
        assert_eq!(till.undo_last().unwrap(), "Undone: returned 10 of Rice.");

        assert!(till.cart().is_empty());
        assert_eq!(till.inventory().quantity(id(1)), Some(100));
        assert_eq!(till.inventory().quantity(id(2)), Some(5));
        assert_eq!(till.undo_last(), Err(UndoError::EmptyUndoLog));
    }

    #[test]
    fn test_undo_restores_low_stock_answers() {
        let mut till = till();
        let before = till.inventory_mut().k_lowest_stock(3);

        till.reserve(id(1), 98).unwrap();
        assert_eq!(till.inventory_mut().k_lowest_stock(1)[0].id, id(1));

        till.undo_last().unwrap();
        assert_eq!(till.inventory_mut().k_lowest_stock(3), before);
    }

    #[test]
    fn test_totals_follow_slabs() {
        let mut till = till();
        till.reserve(id(2), 5).unwrap(); // 100.00
        assert_eq!(till.compute_totals().discount, Money::zero());

        till.reserve(id(3), 2).unwrap(); // +240.00 = 340.00
        let totals = till.compute_totals();
        assert_eq!(totals.subtotal, rupees(340));
        assert_eq!(totals.discount_rate, DiscountRate::from_percent(5));
        assert_eq!(totals.discount, rupees(17));
        assert_eq!(totals.total, rupees(323));
        assert_eq!(till.last_totals(), totals);
    }

    #[test]
    fn test_custom_policy() {
        let mut inventory = Inventory::new();
        inventory.add(1, "Rice", rupees(50), 100).unwrap();
        let mut till = BillingEngine::with_policy(inventory, DiscountPolicy::none());

        till.reserve(id(1), 20).unwrap();
        let totals = till.compute_totals();
        assert_eq!(totals.total, rupees(1000));
        assert!(till.policy().slabs().is_empty());
    }

    #[test]
    fn test_cart_view_in_cart_order() {
        let mut till = till();
        till.reserve(id(3), 1).unwrap();
        till.reserve(id(1), 2).unwrap();
        till.reserve(id(3), 1).unwrap();

        let view = till.cart_view();
        let names: Vec<&str> = view.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Tea", "Rice"]);
        assert_eq!(view[0].quantity, 2);
        assert_eq!(view[0].line_total, rupees(240));
    }

    #[test]
    fn test_checkout_keeps_stock_sold() {
        let mut till = till();
        till.set_customer_name("Asha");
        till.reserve(id(1), 3).unwrap();
        till.reserve(id(2), 1).unwrap();

        let record = till.checkout().unwrap();
        assert_eq!(record.customer_name, "Asha");
        assert_eq!(record.lines.len(), 2);
        assert_eq!(record.subtotal, rupees(170));
        assert_eq!(record.total, rupees(170));

        assert!(till.cart().is_empty());
        assert_eq!(till.undo_depth(), 0);
        assert_eq!(till.customer_name(), "");
        assert_eq!(till.last_totals(), Totals::default());
        assert_eq!(till.inventory().quantity(id(1)), Some(97));
        assert_eq!(till.inventory().quantity(id(2)), Some(4));
    }

    #[test]
    fn test_checkout_empty_cart_rejected() {
        let mut till = till();
        till.set_customer_name("Ravi");
        assert_eq!(till.checkout(), Err(CheckoutError::EmptyCart));
        assert_eq!(till.customer_name(), "Ravi");
    }

    #[test]
    fn test_clear_cart_restores_stock() {
        let mut till = till();
        till.set_customer_name("Asha");
        till.reserve(id(1), 30).unwrap();
        till.reserve(id(2), 5).unwrap();
        till.reserve(id(1), 10).unwrap();

        assert_eq!(till.clear_cart(), 2);
        assert!(till.cart().is_empty());
        assert_eq!(till.undo_depth(), 0);
        assert_eq!(till.customer_name(), "");
        assert_eq!(till.inventory().quantity(id(1)), Some(100));
        assert_eq!(till.inventory().quantity(id(2)), Some(5));
        assert_eq!(till.undo_last(), Err(UndoError::EmptyUndoLog));
    }

    #[test]
    fn test_rice_walkthrough() {
        let mut inventory = Inventory::new();
        inventory.add(1, "Rice", rupees(50), 100).unwrap();
        let mut till = BillingEngine::new(inventory);

        till.reserve(id(1), 10).unwrap();
        assert_eq!(till.inventory().quantity(id(1)), Some(90));
        assert_eq!(till.cart().lines(), &[CartLine { product_id: id(1), quantity: 10 }]);

        assert!(matches!(
            till.reserve(id(1), 200),
            Err(CartError::InsufficientStock { .. })
        ));
        assert_eq!(till.inventory().quantity(id(1)), Some(90));

        // 500.00 is not above 500.00 but is above 200.00
        let totals = till.compute_totals();
        assert_eq!(totals.subtotal, rupees(500));
        assert_eq!(totals.discount, rupees(25));

        till.reserve(id(1), 1).unwrap();
        let totals = till.compute_totals();
        assert_eq!(totals.subtotal, rupees(550));
        assert_eq!(totals.discount, rupees(55));
        assert_eq!(totals.total, rupees(495));

        let record = till.checkout().unwrap();
        assert_eq!(record.total, rupees(495));
        assert!(till.cart().is_empty());
        assert_eq!(till.inventory().quantity(id(1)), Some(89));
        assert_eq!(till.undo_last(), Err(UndoError::EmptyUndoLog));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A successful reserve moves exactly qty; an undo right after
            /// restores stock, cart and log depth.
            #[test]
            fn reserve_then_undo_is_identity(
                warmup in prop::collection::vec((1u64..4, 1i64..6), 0..8),
                pid in 1u64..5,
                qty in -2i64..15,
            ) {
                let mut till = till();
                for (p, q) in warmup {
                    let _ = till.reserve(id(p), q);
                }

                let stock_before = till.inventory().quantity(id(pid));
                let cart_before = till.cart().clone();
                let depth_before = till.undo_depth();
                let in_cart_before = till.cart().get(id(pid)).unwrap_or(0);

                match till.reserve(id(pid), qty) {
                    Ok(_) => {
                        prop_assert_eq!(till.inventory().quantity(id(pid)), stock_before.map(|s| s - qty));
                        prop_assert_eq!(till.cart().get(id(pid)), Some(in_cart_before + qty));

                        till.undo_last().unwrap();
                        prop_assert_eq!(till.inventory().quantity(id(pid)), stock_before);
                        prop_assert_eq!(till.cart(), &cart_before);
                        prop_assert_eq!(till.undo_depth(), depth_before);
                    }
                    Err(_) => {
                        prop_assert_eq!(till.inventory().quantity(id(pid)), stock_before);
                        prop_assert_eq!(till.cart(), &cart_before);
                        prop_assert_eq!(till.undo_depth(), depth_before);
                    }
                }
            }

            /// Stock on the shelf plus stock in the cart never changes until checkout.
            #[test]
            fn stock_is_conserved(
                ops in prop::collection::vec((0u8..3, 1u64..4, 1i64..8), 0..30),
            ) {
                let mut till = till();
                let held = |t: &BillingEngine, p: u64| {
                    t.inventory().quantity(id(p)).unwrap_or(0) + t.cart().get(id(p)).unwrap_or(0)
                };
                let initial: Vec<i64> = (1..4).map(|p| held(&till, p)).collect();

                for (op, p, q) in ops {
                    match op {
                        0 | 1 => { let _ = till.reserve(id(p), q); }
                        _ => { let _ = till.undo_last(); }
                    }
                    let now: Vec<i64> = (1..4).map(|p| held(&till, p)).collect();
                    prop_assert_eq!(&now, &initial);
                }

                till.clear_cart();
                let shelf: Vec<i64> = (1..4).map(|p| till.inventory().quantity(id(p)).unwrap_or(0)).collect();
                prop_assert_eq!(shelf, initial);
            }
        }
    }
}
