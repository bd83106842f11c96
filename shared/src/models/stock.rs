//! Computed stock views. Nothing here is ever persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;
use crate::ledger::is_low_stock_with;
use crate::volume::{bottles_to_liters, quantity_ml};

/// Current stock of one product, recomputed from its transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    #[serde(flatten)]
    pub product: Product,
    /// Raw ledger total, may be negative when sales outran recorded stock
    pub stock_bottles: i64,
    pub stock_ml: i64,
    pub stock_liters: Decimal,
    pub low_stock: bool,
}

impl StockLevel {
    pub fn new(product: Product, stock_bottles: i64, low_stock_threshold: i64) -> Self {
        Self {
            stock_ml: quantity_ml(stock_bottles, product.ml_per_bottle),
            stock_liters: bottles_to_liters(stock_bottles, product.ml_per_bottle),
            low_stock: is_low_stock_with(stock_bottles, low_stock_threshold),
            stock_bottles,
            product,
        }
    }
}
