//! Inventory transaction models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Types of inventory transactions recorded against a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Initial recorded quantity at ledger start
    #[serde(rename = "Opening Stock", alias = "opening_stock")]
    OpeningStock,
    #[serde(rename = "Purchase", alias = "purchase")]
    Purchase,
    #[serde(rename = "Sales", alias = "sales")]
    Sales,
    /// Snapshot marker for reporting, never part of the running total
    #[serde(rename = "Closing Stock", alias = "closing_stock")]
    ClosingStock,
}

/// How a transaction type moves stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    Inbound,
    Outbound,
    Snapshot,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown transaction type: {0}")]
pub struct UnknownTransactionType(pub String);

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::OpeningStock,
        TransactionType::Purchase,
        TransactionType::Sales,
        TransactionType::ClosingStock,
    ];

    /// Label used on the wire and in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::OpeningStock => "Opening Stock",
            TransactionType::Purchase => "Purchase",
            TransactionType::Sales => "Sales",
            TransactionType::ClosingStock => "Closing Stock",
        }
    }

    pub fn direction(&self) -> StockDirection {
        match self {
            TransactionType::OpeningStock | TransactionType::Purchase => StockDirection::Inbound,
            TransactionType::Sales => StockDirection::Outbound,
            TransactionType::ClosingStock => StockDirection::Snapshot,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Opening Stock" | "opening_stock" => Ok(TransactionType::OpeningStock),
            "Purchase" | "purchase" => Ok(TransactionType::Purchase),
            "Sales" | "sales" => Ok(TransactionType::Sales),
            "Closing Stock" | "closing_stock" => Ok(TransactionType::ClosingStock),
            other => Err(UnknownTransactionType(other.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = UnknownTransactionType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An inventory transaction as exchanged with the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryTransaction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub quantity_bottles: i64,
    /// Derived from the product's bottle size when the row was written
    pub quantity_ml: i64,
    pub vendor: Option<String>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A transaction with the running stock after it, in date order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow<T> {
    #[serde(flatten)]
    pub transaction: T,
    pub cumulative_bottles: i64,
}
