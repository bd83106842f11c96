//! Reporting service for dashboard charts and data export
//! Aggregates are computed in memory from the full transaction log

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{compute_stock_levels, InventoryService, TransactionFilter};
use crate::services::products::ProductService;
use shared::{
    bottles_to_liters, latest_closing_snapshot, stock_on_hand, DateRange, InventoryTransaction,
    Product, TransactionType, TypeTotals,
};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Per-product movement totals
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub product_id: Uuid,
    pub category: String,
    pub sub_category: String,
    pub name: String,
    pub label: String,
    pub ml_per_bottle: i32,
    pub opening_stock_bottles: i64,
    pub purchase_bottles: i64,
    pub sales_bottles: i64,
    pub closing_stock_bottles: i64,
    pub opening_stock_ml: i64,
    pub purchase_ml: i64,
    pub sales_ml: i64,
    pub stock_bottles: i64,
    pub stock_liters: Decimal,
    pub last_closing_bottles: Option<i64>,
    /// Closing count minus the ledger stock on the closing date
    pub closing_variance: Option<i64>,
}

/// Totals for a single day, one chart point
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub opening_stock: i64,
    pub purchase: i64,
    pub sales: i64,
    pub closing_stock: i64,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_products: usize,
    pub total_transactions: usize,
    pub total_bottles_on_hand: i64,
    pub total_liters_on_hand: Decimal,
    pub low_stock_products: usize,
}

/// Report filter parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilter {
    pub fn range(&self) -> DateRange {
        let defaults = DateRange::default();
        DateRange::new(
            self.start_date.unwrap_or(defaults.start),
            self.end_date.unwrap_or(defaults.end),
        )
    }
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Movement totals and current stock for every product
    pub async fn get_product_summary(&self) -> AppResult<Vec<ProductSummary>> {
        let (products, transactions) = self.load().await?;
        Ok(build_product_summaries(&products, &transactions))
    }

    /// Per-day totals by transaction type
    pub async fn get_daily_series(&self, filter: &ReportFilter) -> AppResult<Vec<DailyTotals>> {
        let transactions = InventoryService::new(self.db.clone())
            .list_transactions(&TransactionFilter {
                product_id: None,
                start_date: filter.start_date,
                end_date: filter.end_date,
            })
            .await?;

        Ok(build_daily_series(&transactions, &filter.range()))
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self, low_stock_threshold: i64) -> AppResult<DashboardMetrics> {
        let (products, transactions) = self.load().await?;
        Ok(build_dashboard(products, &transactions, low_stock_threshold))
    }

    async fn load(&self) -> AppResult<(Vec<Product>, Vec<InventoryTransaction>)> {
        let products = ProductService::new(self.db.clone()).list_products().await?;
        let transactions = InventoryService::new(self.db.clone())
            .list_transactions(&TransactionFilter::default())
            .await?;
        Ok((products, transactions))
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

pub fn build_product_summaries(
    products: &[Product],
    transactions: &[InventoryTransaction],
) -> Vec<ProductSummary> {
    products
        .iter()
        .map(|product| {
            let own: Vec<&InventoryTransaction> = transactions
                .iter()
                .filter(|t| t.product_id == product.id)
                .collect();

            let mut bottles = TypeTotals::default();
            let mut ml = TypeTotals::default();
            for t in &own {
                bottles.add(t.transaction_type, t.quantity_bottles);
                ml.add(t.transaction_type, t.quantity_ml);
            }

            let stock = stock_on_hand(&own);
            let closing = latest_closing_snapshot(&own);
            let closing_variance = closing.map(|(date, counted)| {
                let expected = stock_on_hand(own.iter().filter(|t| t.date <= date));
                counted.saturating_sub(expected)
            });

            ProductSummary {
                product_id: product.id,
                category: product.category.clone(),
                sub_category: product.sub_category.clone(),
                name: product.name.clone(),
                label: product.display_label(),
                ml_per_bottle: product.ml_per_bottle,
                opening_stock_bottles: bottles.opening_stock,
                purchase_bottles: bottles.purchase,
                sales_bottles: bottles.sales,
                closing_stock_bottles: bottles.closing_stock,
                opening_stock_ml: ml.opening_stock,
                purchase_ml: ml.purchase,
                sales_ml: ml.sales,
                stock_bottles: stock,
                stock_liters: bottles_to_liters(stock, product.ml_per_bottle),
                last_closing_bottles: closing.map(|(_, counted)| counted),
                closing_variance,
            }
        })
        .collect()
}

/// Bucket transactions by date inside `range`, oldest first
pub fn build_daily_series(
    transactions: &[InventoryTransaction],
    range: &DateRange,
) -> Vec<DailyTotals> {
    let mut by_day: BTreeMap<NaiveDate, TypeTotals> = BTreeMap::new();
    for t in transactions.iter().filter(|t| range.contains(t.date)) {
        by_day
            .entry(t.date)
            .or_default()
            .add(t.transaction_type, t.quantity_bottles);
    }

    by_day
        .into_iter()
        .map(|(date, totals)| DailyTotals {
            date,
            opening_stock: totals.get(TransactionType::OpeningStock),
            purchase: totals.get(TransactionType::Purchase),
            sales: totals.get(TransactionType::Sales),
            closing_stock: totals.get(TransactionType::ClosingStock),
        })
        .collect()
}

pub fn build_dashboard(
    products: Vec<Product>,
    transactions: &[InventoryTransaction],
    low_stock_threshold: i64,
) -> DashboardMetrics {
    let total_products = products.len();
    let levels = compute_stock_levels(products, transactions, low_stock_threshold);

    let total_bottles_on_hand = levels
        .iter()
        .map(|l| l.stock_bottles.max(0))
        .fold(0i64, i64::saturating_add);
    let total_liters_on_hand = levels
        .iter()
        .map(|l| bottles_to_liters(l.stock_bottles.max(0), l.product.ml_per_bottle))
        .sum();

    DashboardMetrics {
        total_products,
        total_transactions: transactions.len(),
        total_bottles_on_hand,
        total_liters_on_hand,
        low_stock_products: levels.iter().filter(|l| l.low_stock).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransactionType::*;

    fn product(ml: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            category: "Beer".to_string(),
            sub_category: "Lager".to_string(),
            name: "Pilsner".to_string(),
            ml_per_bottle: ml,
            created_at: None,
            updated_at: None,
        }
    }

    fn tx(product: &Product, date: &str, ty: TransactionType, bottles: i64) -> InventoryTransaction {
        InventoryTransaction {
            id: Uuid::new_v4(),
            product_id: product.id,
            date: date.parse().unwrap(),
            transaction_type: ty,
            quantity_bottles: bottles,
            quantity_ml: shared::quantity_ml(bottles, product.ml_per_bottle),
            vendor: None,
            receipt_number: None,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn test_product_summary_totals_and_variance() {
        let beer = product(330);
        let transactions = vec![
            tx(&beer, "2024-06-01", OpeningStock, 24),
            tx(&beer, "2024-06-02", Sales, 10),
            tx(&beer, "2024-06-03", ClosingStock, 13),
            tx(&beer, "2024-06-04", Purchase, 12),
        ];

        let summary = build_product_summaries(&[beer], &transactions);
        assert_eq!(summary.len(), 1);
        let row = &summary[0];
        assert_eq!(row.opening_stock_bottles, 24);
        assert_eq!(row.sales_ml, 3300);
        assert_eq!(row.stock_bottles, 26);
        assert_eq!(row.last_closing_bottles, Some(13));
        // Ledger said 14 on the closing date, the count found 13
        assert_eq!(row.closing_variance, Some(-1));
    }

    #[test]
    fn test_daily_series_respects_range() {
        let beer = product(330);
        let transactions = vec![
            tx(&beer, "2024-06-02", Sales, 4),
            tx(&beer, "2024-06-01", OpeningStock, 24),
            tx(&beer, "2024-06-02", Sales, 1),
            tx(&beer, "2024-07-01", Purchase, 6),
        ];
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );

        let series = build_daily_series(&transactions, &range);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].opening_stock, 24);
        assert_eq!(series[1].sales, 5);
    }

    #[test]
    fn test_dashboard_floors_negative_stock() {
        let beer = product(500);
        let transactions = vec![
            tx(&beer, "2024-06-01", Purchase, 2),
            tx(&beer, "2024-06-02", Sales, 5),
        ];

        let metrics = build_dashboard(vec![beer], &transactions, 4);
        assert_eq!(metrics.total_bottles_on_hand, 0);
        assert_eq!(metrics.total_liters_on_hand, Decimal::ZERO);
        assert_eq!(metrics.low_stock_products, 1);
    }

    #[test]
    fn test_dashboard_total_saturates() {
        let a = product(750);
        let b = product(750);
        let transactions = vec![
            tx(&a, "2024-06-01", Purchase, i64::MAX),
            tx(&b, "2024-06-01", Purchase, i64::MAX),
        ];

        let metrics = build_dashboard(vec![a, b], &transactions, 4);
        assert_eq!(metrics.total_bottles_on_hand, i64::MAX);
        assert_eq!(metrics.low_stock_products, 0);
    }

    #[test]
    fn test_closing_variance_saturates() {
        let beer = product(330);
        let transactions = vec![
            tx(&beer, "2024-01-01", Sales, 1),
            tx(&beer, "2024-01-02", ClosingStock, i64::MAX),
        ];

        let summary = build_product_summaries(&[beer], &transactions);
        assert_eq!(summary[0].closing_variance, Some(i64::MAX));
    }

    #[test]
    fn test_summary_label() {
        let beer = product(330);
        let summary = build_product_summaries(&[beer], &[]);
        assert_eq!(summary[0].label, "Beer / Lager / Pilsner");
    }

    #[test]
    fn test_csv_export_has_header() {
        let beer = product(330);
        let summary = build_product_summaries(&[beer], &[]);
        let csv = ReportingService::export_to_csv(&summary).unwrap();
        assert!(csv.starts_with("product_id,category,sub_category,name"));
    }
}
