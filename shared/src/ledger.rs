//! Stock ledger reduction
//!
//! Current stock is never stored. It is recomputed on every read by folding a
//! product's transactions into a signed sum:
//! - `Opening Stock` and `Purchase` add their bottle quantity
//! - `Sales` subtracts its bottle quantity
//! - `Closing Stock` is a reporting snapshot and contributes nothing
//!
//! The fold is commutative, so callers may pass transactions in any order.
//! Only the per-row cumulative trace depends on date order.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{InventoryTransaction, LedgerRow, StockDirection, TransactionType};

/// Stock at or below this many bottles is reported as low
pub const LOW_STOCK_THRESHOLD: i64 = 4;

/// Anything that can be folded into a stock total
pub trait LedgerEntry {
    fn transaction_type(&self) -> TransactionType;
    fn quantity_bottles(&self) -> i64;
}

/// Entries that carry a transaction date
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Entries that reference a product
pub trait ProductScoped {
    fn product_id(&self) -> Uuid;
}

impl<T: LedgerEntry + ?Sized> LedgerEntry for &T {
    fn transaction_type(&self) -> TransactionType {
        (**self).transaction_type()
    }

    fn quantity_bottles(&self) -> i64 {
        (**self).quantity_bottles()
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

impl<T: ProductScoped + ?Sized> ProductScoped for &T {
    fn product_id(&self) -> Uuid {
        (**self).product_id()
    }
}

impl LedgerEntry for (TransactionType, i64) {
    fn transaction_type(&self) -> TransactionType {
        self.0
    }

    fn quantity_bottles(&self) -> i64 {
        self.1
    }
}

impl LedgerEntry for InventoryTransaction {
    fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    fn quantity_bottles(&self) -> i64 {
        self.quantity_bottles
    }
}

impl Dated for InventoryTransaction {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl ProductScoped for InventoryTransaction {
    fn product_id(&self) -> Uuid {
        self.product_id
    }
}

/// Signed effect of a single entry on the running stock
pub fn contribution<E: LedgerEntry + ?Sized>(entry: &E) -> i64 {
    let quantity = entry.quantity_bottles();
    match entry.transaction_type().direction() {
        StockDirection::Inbound => quantity,
        StockDirection::Outbound => quantity.saturating_neg(),
        StockDirection::Snapshot => 0,
    }
}

/// Current on-hand bottles for one product's transactions.
///
/// The caller is responsible for passing only the transactions of a single
/// product. The result is not clamped.
pub fn stock_on_hand<I>(entries: I) -> i64
where
    I: IntoIterator,
    I::Item: LedgerEntry,
{
    // i128 keeps the sum exact (and therefore order independent) before clamping
    let total: i128 = entries
        .into_iter()
        .map(|entry| i128::from(contribution(&entry)))
        .sum();
    clamp_to_i64(total)
}

/// Running stock after each entry, in date order.
///
/// Entries sharing a date keep their input order.
pub fn cumulative_trace<E>(entries: &[E]) -> Vec<LedgerRow<E>>
where
    E: LedgerEntry + Dated + Clone,
{
    let mut ordered: Vec<&E> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.date());

    let mut running: i128 = 0;
    ordered
        .into_iter()
        .map(|entry| {
            running += i128::from(contribution(entry));
            LedgerRow {
                transaction: entry.clone(),
                cumulative_bottles: clamp_to_i64(running),
            }
        })
        .collect()
}

/// Stock per product for a known set of products.
///
/// Every known product gets an entry (zero when it has no transactions).
/// Entries pointing at products outside `product_ids` are dropped.
pub fn stock_by_product<P, I>(product_ids: P, entries: I) -> HashMap<Uuid, i64>
where
    P: IntoIterator<Item = Uuid>,
    I: IntoIterator,
    I::Item: LedgerEntry + ProductScoped,
{
    let mut totals: HashMap<Uuid, i128> = product_ids.into_iter().map(|id| (id, 0)).collect();

    for entry in entries {
        if let Some(total) = totals.get_mut(&entry.product_id()) {
            *total += i128::from(contribution(&entry));
        }
    }

    totals
        .into_iter()
        .map(|(id, total)| (id, clamp_to_i64(total)))
        .collect()
}

/// Most recent `Closing Stock` snapshot, if any
pub fn latest_closing_snapshot<I>(entries: I) -> Option<(NaiveDate, i64)>
where
    I: IntoIterator,
    I::Item: LedgerEntry + Dated,
{
    entries
        .into_iter()
        .filter(|entry| entry.transaction_type() == TransactionType::ClosingStock)
        .map(|entry| (entry.date(), entry.quantity_bottles()))
        .fold(None, |latest, candidate| match latest {
            Some((date, _)) if date > candidate.0 => latest,
            _ => Some(candidate),
        })
}

/// Floor used when showing stock to a user
pub fn display_stock(stock: i64) -> i64 {
    stock.max(0)
}

/// Low-stock check against the default threshold
pub fn is_low_stock(stock: i64) -> bool {
    is_low_stock_with(stock, LOW_STOCK_THRESHOLD)
}

pub fn is_low_stock_with(stock: i64, threshold: i64) -> bool {
    display_stock(stock) <= threshold
}

/// Bottle totals per transaction type, for reporting charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub opening_stock: i64,
    pub purchase: i64,
    pub sales: i64,
    pub closing_stock: i64,
}

impl TypeTotals {
    pub fn add(&mut self, transaction_type: TransactionType, quantity: i64) {
        let slot = match transaction_type {
            TransactionType::OpeningStock => &mut self.opening_stock,
            TransactionType::Purchase => &mut self.purchase,
            TransactionType::Sales => &mut self.sales,
            TransactionType::ClosingStock => &mut self.closing_stock,
        };
        *slot = slot.saturating_add(quantity);
    }

    pub fn get(&self, transaction_type: TransactionType) -> i64 {
        match transaction_type {
            TransactionType::OpeningStock => self.opening_stock,
            TransactionType::Purchase => self.purchase,
            TransactionType::Sales => self.sales,
            TransactionType::ClosingStock => self.closing_stock,
        }
    }

    /// Stock implied by these totals (closing snapshots excluded)
    pub fn net(&self) -> i64 {
        self.opening_stock
            .saturating_add(self.purchase)
            .saturating_sub(self.sales)
    }
}

pub fn totals_by_type<I>(entries: I) -> TypeTotals
where
    I: IntoIterator,
    I::Item: LedgerEntry,
{
    let mut totals = TypeTotals::default();
    for entry in entries {
        totals.add(entry.transaction_type(), entry.quantity_bottles());
    }
    totals
}

fn clamp_to_i64(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use TransactionType::*;

    fn tx(product_id: Uuid, date: &str, ty: TransactionType, bottles: i64) -> InventoryTransaction {
        InventoryTransaction {
            id: Uuid::new_v4(),
            product_id,
            date: date.parse().unwrap(),
            transaction_type: ty,
            quantity_bottles: bottles,
            quantity_ml: bottles * 750,
            vendor: None,
            receipt_number: None,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn test_empty_ledger_is_zero() {
        let entries: Vec<(TransactionType, i64)> = vec![];
        assert_eq!(stock_on_hand(&entries), 0);
    }

    #[test]
    fn test_opening_purchase_sales() {
        let entries = [(OpeningStock, 10), (Purchase, 5), (Sales, 3)];
        assert_eq!(stock_on_hand(&entries), 12);
    }

    #[test]
    fn test_closing_stock_is_ignored() {
        let entries = [(OpeningStock, 10), (ClosingStock, 2), (Sales, 1)];
        assert_eq!(stock_on_hand(&entries), 9);
    }

    #[test]
    fn test_stock_can_go_negative() {
        let entries = [(Purchase, 2), (Sales, 5)];
        assert_eq!(stock_on_hand(&entries), -3);
        assert_eq!(display_stock(-3), 0);
        assert!(is_low_stock(-3));
    }

    #[test]
    fn test_extreme_quantities_clamp() {
        let entries = [(Purchase, i64::MAX), (Purchase, i64::MAX), (Sales, 1)];
        assert_eq!(stock_on_hand(&entries), i64::MAX);

        let reordered = [(Sales, 1), (Purchase, i64::MAX), (Purchase, i64::MAX)];
        assert_eq!(stock_on_hand(&reordered), i64::MAX);
    }

    #[test]
    fn test_low_stock_boundaries() {
        assert!(is_low_stock(0));
        assert!(is_low_stock(4));
        assert!(!is_low_stock(5));
        assert!(is_low_stock_with(9, 10));
    }

    #[test]
    fn test_cumulative_trace_runs_in_date_order() {
        let product = Uuid::new_v4();
        let entries = vec![
            tx(product, "2024-03-03", Sales, 3),
            tx(product, "2024-03-01", OpeningStock, 10),
            tx(product, "2024-03-02", Purchase, 5),
            tx(product, "2024-03-04", ClosingStock, 12),
        ];

        let trace = cumulative_trace(&entries);
        let running: Vec<i64> = trace.iter().map(|row| row.cumulative_bottles).collect();
        assert_eq!(running, vec![10, 15, 12, 12]);
        assert_eq!(trace[0].transaction.transaction_type, OpeningStock);
    }

    #[test]
    fn test_stock_by_product_filters_unknown_products() {
        let kept = Uuid::new_v4();
        let idle = Uuid::new_v4();
        let deleted = Uuid::new_v4();
        let entries = vec![
            tx(kept, "2024-03-01", OpeningStock, 6),
            tx(deleted, "2024-03-01", OpeningStock, 100),
            tx(kept, "2024-03-02", Sales, 2),
        ];

        let stock = stock_by_product([kept, idle], &entries);
        assert_eq!(stock.len(), 2);
        assert_eq!(stock[&kept], 4);
        assert_eq!(stock[&idle], 0);
        assert!(!stock.contains_key(&deleted));
    }

    #[test]
    fn test_latest_closing_snapshot() {
        let product = Uuid::new_v4();
        let entries = vec![
            tx(product, "2024-03-05", ClosingStock, 7),
            tx(product, "2024-03-01", OpeningStock, 10),
            tx(product, "2024-03-02", ClosingStock, 9),
        ];

        let snapshot = latest_closing_snapshot(&entries);
        assert_eq!(snapshot, Some(("2024-03-05".parse().unwrap(), 7)));
    }

    #[test]
    fn test_totals_by_type() {
        let entries = [(OpeningStock, 10), (Purchase, 5), (Purchase, 1), (Sales, 3), (ClosingStock, 13)];
        let totals = totals_by_type(&entries);
        assert_eq!(totals.purchase, 6);
        assert_eq!(totals.get(ClosingStock), 13);
        assert_eq!(totals.net(), stock_on_hand(&entries));
    }

    #[test]
    fn test_same_day_rows_keep_input_order() {
        let product = Uuid::new_v4();
        let opening = tx(product, "2024-03-01", OpeningStock, 2);
        let sale = tx(product, "2024-03-02", Sales, 3);
        let delivery = tx(product, "2024-03-02", Purchase, 5);

        let sale_first = cumulative_trace(&[opening.clone(), sale.clone(), delivery.clone()]);
        let ids: Vec<Uuid> = sale_first.iter().map(|row| row.transaction.id).collect();
        assert_eq!(ids, vec![opening.id, sale.id, delivery.id]);
        let running: Vec<i64> = sale_first.iter().map(|row| row.cumulative_bottles).collect();
        assert_eq!(running, vec![2, -1, 4]);

        let delivery_first = cumulative_trace(&[delivery.clone(), opening.clone(), sale.clone()]);
        let ids: Vec<Uuid> = delivery_first.iter().map(|row| row.transaction.id).collect();
        assert_eq!(ids, vec![opening.id, delivery.id, sale.id]);
        let running: Vec<i64> = delivery_first.iter().map(|row| row.cumulative_bottles).collect();
        assert_eq!(running, vec![2, 7, 4]);
    }

    fn entry_strategy() -> impl Strategy<Value = (TransactionType, i64, u32)> {
        (
            prop::sample::select(TransactionType::ALL.to_vec()),
            0i64..1_000,
            1u32..=28,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Shuffling keeps the final total; rows always come out in date order
        #[test]
        fn prop_shuffled_trace_keeps_total(
            (original, shuffled) in prop::collection::vec(entry_strategy(), 0..20)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let product = Uuid::new_v4();
            let build = |entries: &[(TransactionType, i64, u32)]| -> Vec<InventoryTransaction> {
                entries
                    .iter()
                    .map(|(ty, q, d)| tx(product, &format!("2024-02-{:02}", d), *ty, *q))
                    .collect()
            };
            let a = cumulative_trace(&build(&original));
            let b = cumulative_trace(&build(&shuffled));

            let total_a = a.last().map(|row| row.cumulative_bottles).unwrap_or(0);
            let total_b = b.last().map(|row| row.cumulative_bottles).unwrap_or(0);
            prop_assert_eq!(total_a, total_b);
            prop_assert!(b.windows(2).all(|w| w[0].transaction.date <= w[1].transaction.date));
        }
    }
}
