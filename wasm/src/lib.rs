//! WebAssembly module for the bar inventory dashboard
//!
//! Provides client-side computation for:
//! - Stock on hand from a transaction list
//! - Per-row cumulative ledger traces
//! - Low-stock flags and volume conversion
//!
//! Inputs arrive as JSON. A transaction with a missing or non-integer
//! `quantity_bottles` fails to parse and is reported as an error instead of
//! being summed.

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::ledger::*;
pub use shared::models::*;
pub use shared::volume::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("bar inventory ledger ready"));
}

fn parse<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Largest integer a JS number holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Bottle count from a JS number. Rejects NaN, infinities, fractions and
/// values past the safe-integer range.
fn whole_bottles(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Some(value as i64)
    } else {
        None
    }
}

fn bottles_arg(value: f64) -> Result<i64, JsValue> {
    whole_bottles(value)
        .ok_or_else(|| JsValue::from_str(&format!("Invalid bottle count: {}", value)))
}

/// Bottles on hand for one product's transactions, as a BigInt
#[wasm_bindgen]
pub fn calculate_stock(transactions_json: &str) -> Result<i64, JsValue> {
    let transactions: Vec<InventoryTransaction> = parse(transactions_json, "transactions")?;
    Ok(stock_on_hand(&transactions))
}

/// Milliliters on hand for one product's transactions, as a BigInt
#[wasm_bindgen]
pub fn calculate_stock_ml(transactions_json: &str, ml_per_bottle: i32) -> Result<i64, JsValue> {
    let transactions: Vec<InventoryTransaction> = parse(transactions_json, "transactions")?;
    Ok(quantity_ml(stock_on_hand(&transactions), ml_per_bottle))
}

/// Date-ordered rows with a `cumulative_bottles` column, as JSON
#[wasm_bindgen]
pub fn calculate_cumulative_trace(transactions_json: &str) -> Result<String, JsValue> {
    let transactions: Vec<InventoryTransaction> = parse(transactions_json, "transactions")?;
    to_json(&cumulative_trace(&transactions))
}

/// Map of product id to bottles on hand, as JSON.
///
/// Transactions for products missing from `products_json` are skipped.
#[wasm_bindgen]
pub fn calculate_stock_by_product(
    products_json: &str,
    transactions_json: &str,
) -> Result<String, JsValue> {
    let products: Vec<Product> = parse(products_json, "products")?;
    let transactions: Vec<InventoryTransaction> = parse(transactions_json, "transactions")?;

    let stock: HashMap<Uuid, i64> = stock_by_product(products.iter().map(|p| p.id), &transactions);
    to_json(&stock)
}

/// Low-stock flag for a stock figure, using the default threshold
#[wasm_bindgen]
pub fn check_low_stock(stock_bottles: f64) -> Result<bool, JsValue> {
    Ok(is_low_stock(bottles_arg(stock_bottles)?))
}

/// Liters for a bottle count
#[wasm_bindgen]
pub fn convert_bottles_to_liters(bottles: f64, ml_per_bottle: i32) -> Result<f64, JsValue> {
    let liters = bottles_to_liters(bottles_arg(bottles)?, ml_per_bottle);
    Ok(liters.to_string().parse().unwrap_or(0.0))
}
