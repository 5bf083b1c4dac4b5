//! Demo configuration module.
//!
//! Configuration is loaded from `TALLY_*` environment variables with fallback
//! to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use tally_core::{ReceiptFormat, DEFAULT_LOW_STOCK_COUNT};

/// How the finished sale is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width text receipt
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

/// Demo till configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Receipt banner
    pub store_name: String,

    /// Printed before every amount
    pub currency_symbol: String,

    /// Width of the receipt rules
    pub receipt_width: usize,

    /// How many products the low-stock report lists
    pub low_stock_count: usize,

    /// Customer printed on the receipt (may be empty)
    pub customer_name: String,

    pub output: OutputFormat,
}

impl DemoConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value when set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let receipt = ReceiptFormat::default();

        let config = DemoConfig {
            store_name: lookup("TALLY_STORE_NAME").unwrap_or(receipt.title),

            currency_symbol: lookup("TALLY_CURRENCY_SYMBOL").unwrap_or(receipt.currency_symbol),

            receipt_width: parse_or(&lookup, "TALLY_RECEIPT_WIDTH", receipt.width)?,

            low_stock_count: parse_or(&lookup, "TALLY_LOW_STOCK_COUNT", DEFAULT_LOW_STOCK_COUNT)?,

            customer_name: lookup("TALLY_CUSTOMER_NAME")
                .map(|name| name.trim().to_string())
                .unwrap_or_default(),

            output: parse_or(&lookup, "TALLY_OUTPUT", OutputFormat::default())?,
        };

        if config.receipt_width == 0 {
            return Err(ConfigError::InvalidValue("TALLY_RECEIPT_WIDTH".to_string()));
        }

        Ok(config)
    }

    /// Receipt layout built from this configuration.
    pub fn receipt_format(&self) -> ReceiptFormat {
        ReceiptFormat {
            title: self.store_name.clone(),
            currency_symbol: self.currency_symbol.clone(),
            width: self.receipt_width,
            ..ReceiptFormat::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
