//! # Checkout Records & Receipts
//!
//! A [`CheckoutRecord`] is the immutable result of a completed sale. It
//! carries everything a receipt needs, so the presentation layer never has to
//! look back into the inventory.
//!
//! ## Rendered Receipt (default format)
//! ```text
//! =====================================
//!  SUPERMARKET BILL
//! =====================================
//! Bill Date: 2026-10-19 14:03:55
//! Customer: Asha
//!
//! Item Qty Price Total
//! -------------------------------------
//! Rice                  11 ₹ 50.00 ₹550.00
//! -------------------------------------
//! Subtotal:                ₹550.00
//! Discount:                ₹ 55.00
//! -------------------------------------
//! TOTAL:                   ₹495.00
//!
//! Thank you for shopping!
//! =====================================
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::billing::Totals;
use crate::money::Money;
use crate::types::ProductId;

// =============================================================================
// Receipt Line
// =============================================================================

/// One itemized line, priced at the moment it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

// =============================================================================
// Checkout Record
// =============================================================================

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable receipt number: `yymmdd-HHMMSS-xxxx`.
    pub receipt_number: String,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// May be empty.
    pub customer_name: String,

    /// Lines in cart order.
    pub lines: Vec<ReceiptLine>,

    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl CheckoutRecord {
    pub(crate) fn new(
        customer_name: String,
        lines: Vec<ReceiptLine>,
        totals: Totals,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4();
        CheckoutRecord {
            id: id.to_string(),
            receipt_number: receipt_number(timestamp, &id),
            timestamp,
            customer_name,
            lines,
            subtotal: totals.subtotal,
            discount: totals.discount,
            total: totals.total,
        }
    }

    /// Units sold across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Renders the fixed-width text receipt.
    pub fn render(&self, format: &ReceiptFormat) -> String {
        self.display(format).to_string()
    }

    /// The receipt as a [`fmt::Display`] value, for writing it out directly.
    pub fn display<'a>(&'a self, format: &'a ReceiptFormat) -> ReceiptDisplay<'a> {
        ReceiptDisplay {
            record: self,
            format,
        }
    }
}

/// Text receipt for one [`CheckoutRecord`]. See [`CheckoutRecord::display`].
#[derive(Debug, Clone, Copy)]
pub struct ReceiptDisplay<'a> {
    record: &'a CheckoutRecord,
    format: &'a ReceiptFormat,
}

impl fmt::Display for ReceiptDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (record, format) = (self.record, self.format);
        let heavy = "=".repeat(format.width);
        let light = "-".repeat(format.width);
        let cur = format.currency_symbol.as_str();
        let (name_col, label_col) = (NAME_COLUMN, LABEL_COLUMN);

        writeln!(f, "{heavy}")?;
        writeln!(f, " {} ", format.title)?;
        writeln!(f, "{heavy}")?;
        writeln!(f, "Bill Date: {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Customer: {}", record.customer_name)?;
        writeln!(f)?;
        writeln!(f, "Item Qty Price Total")?;
        writeln!(f, "{light}")?;

        for line in &record.lines {
            let name: String = line.name.chars().take(NAME_COLUMN).collect();
            writeln!(
                f,
                "{name:<name_col$} {:>3} {cur}{:>6} {cur}{:>6}",
                line.quantity, line.unit_price, line.line_total
            )?;
        }

        writeln!(f, "{light}")?;
        writeln!(f, "{:<label_col$} {cur}{:>6}", "Subtotal:", record.subtotal)?;
        writeln!(f, "{:<label_col$} {cur}{:>6}", "Discount:", record.discount)?;
        writeln!(f, "{light}")?;
        writeln!(f, "{:<label_col$} {cur}{:>6}", "TOTAL:", record.total)?;
        writeln!(f)?;
        writeln!(f, "{}", format.footer)?;
        write!(f, "{heavy}")
    }
}

const NAME_COLUMN: usize = 20;
const LABEL_COLUMN: usize = 24;

/// `yymmdd-HHMMSS-` plus the first four hex digits of the record id.
fn receipt_number(at: DateTime<Utc>, id: &Uuid) -> String {
    let suffix: String = id.simple().to_string().chars().take(4).collect();
    format!("{}-{}", at.format("%y%m%d-%H%M%S"), suffix)
}

// =============================================================================
// Receipt Format
// =============================================================================

/// Presentation knobs for [`CheckoutRecord::render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptFormat {
    /// Banner between the top rules, printed flush left with one space of
    /// padding on each side.
    pub title: String,

    /// Printed before every amount.
    pub currency_symbol: String,

    /// Closing line.
    pub footer: String,

    /// Width of the `=====` and `-----` rules.
    pub width: usize,
}

impl Default for ReceiptFormat {
    fn default() -> Self {
        ReceiptFormat {
            title: "SUPERMARKET BILL".to_string(),
            currency_symbol: "₹".to_string(),
            footer: "Thank you for shopping!".to_string(),
            width: 37,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscountRate;
    use chrono::TimeZone;

    fn record() -> CheckoutRecord {
        let rice = ReceiptLine {
            product_id: ProductId::new(1),
            name: "Basmati Rice Premium Long Grain".to_string(),
            quantity: 11,
            unit_price: Money::from_cents(5000),
            line_total: Money::from_cents(55_000),
        };
        let totals = Totals {
            subtotal: Money::from_cents(55_000),
            discount_rate: DiscountRate::from_percent(10),
            discount: Money::from_cents(5_500),
            total: Money::from_cents(49_500),
        };
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 3, 55).unwrap();
        CheckoutRecord::new("Asha".to_string(), vec![rice], totals, at)
    }

    #[test]
    fn test_record_identity() {
        let record = record();
        assert!(Uuid::parse_str(&record.id).is_ok());
        assert!(record.receipt_number.starts_with("261019-140355-"));
        assert_eq!(record.receipt_number.len(), "261019-140355-".len() + 4);
        assert_eq!(record.total_quantity(), 11);
    }

    #[test]
    fn test_render_layout() {
        let text = record().render(&ReceiptFormat::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(37));
        assert_eq!(lines[1], " SUPERMARKET BILL ");
        assert_eq!(lines[3], "Bill Date: 2026-10-19 14:03:55");
        assert_eq!(lines[4], "Customer: Asha");
        assert_eq!(lines[6], "Item Qty Price Total");
        assert_eq!(lines[8], "Basmati Rice Premium  11 ₹ 50.00 ₹550.00");
        assert_eq!(lines[10], "Subtotal:                ₹550.00");
        assert_eq!(lines[11], "Discount:                ₹ 55.00");
        assert_eq!(lines[13], "TOTAL:                   ₹495.00");
        assert_eq!(lines[15], "Thank you for shopping!");
        assert_eq!(lines.last().copied(), Some("=".repeat(37).as_str()));
    }

    #[test]
    fn test_display_matches_render() {
        let record = record();
        let format = ReceiptFormat::default();
        assert_eq!(format!("{}", record.display(&format)), record.render(&format));
    }

    #[test]
    fn test_render_custom_format() {
        let format = ReceiptFormat {
            title: "CORNER STORE".to_string(),
            currency_symbol: "Rs.".to_string(),
            footer: "Visit again".to_string(),
            width: 20,
        };
        let text = record().render(&format);

        assert!(text.starts_with(&"=".repeat(20)));
        assert_eq!(text.lines().nth(1), Some(" CORNER STORE "));
        assert!(text.contains("TOTAL:                   Rs.495.00"));
        assert!(text.contains("Visit again"));
    }

    #[test]
    fn test_record_serializes_amounts_as_minor_units() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["total"], 49_500);
        assert_eq!(json["lines"][0]["product_id"], 1);
        assert_eq!(json["customer_name"], "Asha");
    }
}
