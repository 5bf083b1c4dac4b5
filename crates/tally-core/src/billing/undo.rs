//! # Undo Log
//!
//! A stack of cart actions. Each entry carries enough to compensate for
//! itself, and entries are reversed strictly last-in, first-out.
//!
//! ```text
//!   reserve(Rice, 10) ──► push Reserve { Rice, 10 }
//!   reserve(Salt, 2)  ──► push Reserve { Salt, 2 }
//!   undo_last()       ──► pop  Reserve { Salt, 2 }  → Salt stock += 2
//!   undo_last()       ──► pop  Reserve { Rice, 10 } → Rice stock += 10
//!   undo_last()       ──► EmptyUndoLog
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::ProductId;

/// A reversible cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum CartAction {
    /// `quantity` units of `product_id` moved from the shelf into the cart.
    Reserve { product_id: ProductId, quantity: i64 },
}

impl CartAction {
    pub fn product_id(&self) -> ProductId {
        match self {
            CartAction::Reserve { product_id, .. } => *product_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoLog {
    actions: Vec<CartAction>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, action: CartAction) {
        self.actions.push(action);
    }

    pub(crate) fn pop(&mut self) -> Option<CartAction> {
        self.actions.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.actions.clear();
    }

    /// The action the next undo would reverse.
    pub fn peek(&self) -> Option<&CartAction> {
        self.actions.last()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
