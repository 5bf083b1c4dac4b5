//! # Tally POS Demo Till
//!
//! Runs one scripted sale against an in-memory inventory and prints the
//! receipt.
//!
//! ## Session Script
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize tracing (RUST_LOG, default `info`)                       │
//! │  2. Load DemoConfig from TALLY_* variables                              │
//! │  3. Stock the shelf from CATALOGUE                                      │
//! │  4. Cancelled sale: reserve, clear_cart (stock restored)                │
//! │  5. Real sale: reserve, one rejected reservation, undo_last             │
//! │  6. Low-stock report                                                    │
//! │  7. Checkout, print receipt (text) or report (json)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//! | Variable                | Default              |
//! |-------------------------|----------------------|
//! | `TALLY_STORE_NAME`      | `SUPERMARKET BILL`   |
//! | `TALLY_CURRENCY_SYMBOL` | `₹`                  |
//! | `TALLY_RECEIPT_WIDTH`   | `37`                 |
//! | `TALLY_LOW_STOCK_COUNT` | `5`                  |
//! | `TALLY_CUSTOMER_NAME`   | empty                |
//! | `TALLY_OUTPUT`          | `text` (or `json`)   |

mod config;

use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tally_core::{BillingEngine, CheckoutRecord, CoreError, Inventory, Money, Product, ProductId};

use crate::config::{ConfigError, DemoConfig, OutputFormat};

/// Shelf contents at opening: id, name, price in minor units, stock.
const CATALOGUE: &[(u64, &str, i64, i64)] = &[
    (101, "Basmati Rice 1kg", 5_000, 100),
    (102, "Toor Dal 1kg", 14_000, 40),
    (103, "Sunflower Oil 1L", 16_500, 12),
    (104, "Iodized Salt 1kg", 2_000, 8),
    (105, "Assam Tea 250g", 12_000, 15),
    (106, "Sugar 1kg", 4_500, 6),
    (107, "Turmeric 100g", 3_500, 4),
];

/// Top-level demo errors.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// What `TALLY_OUTPUT=json` prints.
#[derive(Debug, Serialize)]
struct SaleReport<'a> {
    low_stock: &'a [Product],
    checkout: &'a CheckoutRecord,
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Demo session failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let config = DemoConfig::load()?;
    info!(store = %config.store_name, output = ?config.output, "Tally demo starting");

    let mut till = BillingEngine::new(stock_shelf()?);

    cancelled_sale(&mut till)?;

    till.set_customer_name(config.customer_name.clone());
    for (id, qty) in [(101, 8), (104, 3), (105, 2), (106, 5)] {
        let added = till.reserve(ProductId::new(id), qty).map_err(CoreError::from)?;
        info!("{added}");
    }

    // More oil than the shelf holds: rejected, nothing changes.
    if let Err(e) = till.reserve(ProductId::new(103), 50) {
        warn!(error = %e, "Reservation rejected");
    }

    let undone = till.undo_last().map_err(CoreError::from)?;
    info!("{undone}");

    for line in till.cart_view() {
        info!(
            product_id = %line.product_id,
            name = %line.name,
            quantity = line.quantity,
            line_total = %line.line_total,
            "In cart"
        );
    }
    let totals = till.compute_totals();
    info!(
        subtotal = %totals.subtotal,
        discount = %totals.discount,
        total = %totals.total,
        "Bill totals"
    );

    let low_stock = till.inventory_mut().k_lowest_stock(config.low_stock_count);
    for product in &low_stock {
        info!(product_id = %product.id, name = %product.name, stock = product.quantity, "Low stock");
    }

    let record = till.checkout().map_err(CoreError::from)?;

    match config.output {
        OutputFormat::Text => {
            let format = config.receipt_format();
            println!("{}", record.display(&format));
        }
        OutputFormat::Json => {
            let report = SaleReport {
                low_stock: &low_stock,
                checkout: &record,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn stock_shelf() -> Result<Inventory, CoreError> {
    let mut inventory = Inventory::new();
    for &(id, name, cents, qty) in CATALOGUE {
        inventory.add(id, name, Money::from_cents(cents), qty)?;
    }
    info!(products = inventory.len(), "Shelf stocked");
    Ok(inventory)
}

/// A customer changes their mind: everything reserved goes back.
fn cancelled_sale(till: &mut BillingEngine) -> Result<(), CoreError> {
    till.set_customer_name("Walk-in");
    till.reserve(ProductId::new(102), 4)?;
    till.reserve(ProductId::new(107), 2)?;

    let returned = till.clear_cart();
    info!(lines = returned, "Sale cancelled, stock returned");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every stock mutation
/// - `RUST_LOG=tally_core=trace` - Trace for the core only
/// - Default: INFO level
///
/// Logs go to stderr so the receipt on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
