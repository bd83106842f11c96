//! Inventory service for the transaction log and derived stock levels
//!
//! Stock is never written anywhere. Every read fetches the full product and
//! transaction lists and folds them through `shared::ledger`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::products::ProductService;
use shared::{
    cumulative_trace, latest_closing_snapshot, quantity_ml, stock_by_product, stock_on_hand,
    validate_quantity, InventoryTransaction, LedgerRow, Product, StockLevel, TransactionType,
};

const TRANSACTION_COLUMNS: &str = "id, product_id, date, transaction_type, quantity_bottles, \
     quantity_ml, vendor, receipt_number, notes, created_at";

/// Inventory service for managing stock transactions
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

#[derive(Debug, Clone, FromRow)]
struct TransactionRecord {
    id: Uuid,
    product_id: Uuid,
    date: NaiveDate,
    #[sqlx(try_from = "String")]
    transaction_type: TransactionType,
    quantity_bottles: i64,
    quantity_ml: i64,
    vendor: Option<String>,
    receipt_number: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TransactionRecord> for InventoryTransaction {
    fn from(record: TransactionRecord) -> Self {
        InventoryTransaction {
            id: record.id,
            product_id: record.product_id,
            date: record.date,
            transaction_type: record.transaction_type,
            quantity_bottles: record.quantity_bottles,
            quantity_ml: record.quantity_ml,
            vendor: record.vendor,
            receipt_number: record.receipt_number,
            notes: record.notes,
            created_at: Some(record.created_at),
        }
    }
}

/// Input for recording an inventory transaction
#[derive(Debug, Deserialize)]
pub struct RecordTransactionInput {
    pub product_id: Uuid,
    pub transaction_type: TransactionType,
    pub quantity_bottles: i64,
    pub date: Option<NaiveDate>,
    pub vendor: Option<String>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
}

/// Input for editing a transaction. An empty string clears a text field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionInput {
    pub product_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
    pub quantity_bottles: Option<i64>,
    pub date: Option<NaiveDate>,
    pub vendor: Option<String>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
}

/// Filters for listing transactions
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionFilter {
    pub product_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Stock of one product with its date-ordered ledger
#[derive(Debug, Serialize)]
pub struct ProductLedger {
    pub stock: StockLevel,
    pub ledger: Vec<LedgerRow<InventoryTransaction>>,
    pub last_closing_date: Option<NaiveDate>,
    pub last_closing_bottles: Option<i64>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List transactions in date order
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<InventoryTransaction>> {
        let records = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            SELECT {}
            FROM inventory_transactions
            WHERE ($1::uuid IS NULL OR product_id = $1)
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date ASC, created_at ASC
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(filter.product_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(records.into_iter().map(InventoryTransaction::from).collect())
    }

    pub async fn get_transaction(&self, transaction_id: Uuid) -> AppResult<InventoryTransaction> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            "SELECT {} FROM inventory_transactions WHERE id = $1",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?;

        Ok(record.into())
    }

    /// Record an inventory transaction, deriving milliliters from the product
    pub async fn record_transaction(
        &self,
        user_id: Uuid,
        input: RecordTransactionInput,
    ) -> AppResult<InventoryTransaction> {
        validate_quantity(input.transaction_type, input.quantity_bottles)
            .map_err(|m| AppError::validation("quantity_bottles", m))?;

        let product = self.find_product(input.product_id).await?;
        let ml = quantity_ml(input.quantity_bottles, product.ml_per_bottle);
        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());

        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            INSERT INTO inventory_transactions (
                product_id, date, transaction_type, quantity_bottles, quantity_ml,
                vendor, receipt_number, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(product.id)
        .bind(date)
        .bind(input.transaction_type.as_str())
        .bind(input.quantity_bottles)
        .bind(ml)
        .bind(&input.vendor)
        .bind(&input.receipt_number)
        .bind(&input.notes)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            transaction_id = %record.id,
            product_id = %product.id,
            transaction_type = %input.transaction_type,
            bottles = input.quantity_bottles,
            "Recorded inventory transaction"
        );
        Ok(record.into())
    }

    /// Edit a transaction. Milliliters are re-derived from the current product.
    pub async fn update_transaction(
        &self,
        transaction_id: Uuid,
        input: UpdateTransactionInput,
    ) -> AppResult<InventoryTransaction> {
        let existing = self.get_transaction(transaction_id).await?;

        let transaction_type = input.transaction_type.unwrap_or(existing.transaction_type);
        let quantity_bottles = input.quantity_bottles.unwrap_or(existing.quantity_bottles);
        validate_quantity(transaction_type, quantity_bottles)
            .map_err(|m| AppError::validation("quantity_bottles", m))?;

        let product = self
            .find_product(input.product_id.unwrap_or(existing.product_id))
            .await?;
        let ml = quantity_ml(quantity_bottles, product.ml_per_bottle);

        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            UPDATE inventory_transactions
            SET product_id = $1, date = $2, transaction_type = $3, quantity_bottles = $4,
                quantity_ml = $5, vendor = $6, receipt_number = $7, notes = $8
            WHERE id = $9
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(product.id)
        .bind(input.date.unwrap_or(existing.date))
        .bind(transaction_type.as_str())
        .bind(quantity_bottles)
        .bind(ml)
        .bind(merge_text(input.vendor, existing.vendor))
        .bind(merge_text(input.receipt_number, existing.receipt_number))
        .bind(merge_text(input.notes, existing.notes))
        .bind(transaction_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(transaction_id = %transaction_id, "Updated inventory transaction");
        Ok(record.into())
    }

    pub async fn delete_transaction(&self, transaction_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction".to_string()));
        }

        tracing::info!(transaction_id = %transaction_id, "Deleted inventory transaction");
        Ok(())
    }

    /// Current stock for every product
    pub async fn stock_levels(&self, low_stock_threshold: i64) -> AppResult<Vec<StockLevel>> {
        let products = ProductService::new(self.db.clone()).list_products().await?;
        let transactions = self.list_transactions(&TransactionFilter::default()).await?;

        tracing::debug!(
            products = products.len(),
            transactions = transactions.len(),
            "Recomputing stock levels"
        );

        Ok(compute_stock_levels(products, &transactions, low_stock_threshold))
    }

    /// Stock and cumulative ledger for one product
    pub async fn product_ledger(
        &self,
        product_id: Uuid,
        low_stock_threshold: i64,
    ) -> AppResult<ProductLedger> {
        let product = ProductService::new(self.db.clone())
            .get_product(product_id)
            .await?;
        let transactions = self
            .list_transactions(&TransactionFilter {
                product_id: Some(product_id),
                ..Default::default()
            })
            .await?;

        let stock = StockLevel::new(product, stock_on_hand(&transactions), low_stock_threshold);
        let closing = latest_closing_snapshot(&transactions);

        Ok(ProductLedger {
            stock,
            ledger: cumulative_trace(&transactions),
            last_closing_date: closing.map(|(date, _)| date),
            last_closing_bottles: closing.map(|(_, bottles)| bottles),
        })
    }

    /// Products at or below the low-stock threshold
    pub async fn low_stock(&self, low_stock_threshold: i64) -> AppResult<Vec<StockLevel>> {
        let levels = self.stock_levels(low_stock_threshold).await?;
        Ok(levels.into_iter().filter(|level| level.low_stock).collect())
    }

    async fn find_product(&self, product_id: Uuid) -> AppResult<Product> {
        ProductService::new(self.db.clone())
            .get_product(product_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::validation("product_id", "Unknown product"),
                other => other,
            })
    }
}

/// Absent keeps the stored value, blank clears it
fn merge_text(edit: Option<String>, existing: Option<String>) -> Option<String> {
    match edit {
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value),
        None => existing,
    }
}

/// Pair each product with its recomputed stock, keeping product order.
///
/// Transactions for products not in `products` are ignored.
pub fn compute_stock_levels(
    products: Vec<Product>,
    transactions: &[InventoryTransaction],
    low_stock_threshold: i64,
) -> Vec<StockLevel> {
    let stock = stock_by_product(products.iter().map(|p| p.id), transactions);

    products
        .into_iter()
        .map(|product| {
            let bottles = stock.get(&product.id).copied().unwrap_or(0);
            StockLevel::new(product, bottles, low_stock_threshold)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, ml: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            category: "Spirits".to_string(),
            sub_category: "Gin".to_string(),
            name: name.to_string(),
            ml_per_bottle: ml,
            created_at: None,
            updated_at: None,
        }
    }

    fn tx(product_id: Uuid, ty: TransactionType, bottles: i64) -> InventoryTransaction {
        InventoryTransaction {
            id: Uuid::new_v4(),
            product_id,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            transaction_type: ty,
            quantity_bottles: bottles,
            quantity_ml: 0,
            vendor: None,
            receipt_number: None,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn test_compute_stock_levels() {
        let gin = product("Dry Gin", 700);
        let tonic = product("Tonic", 200);
        let gin_id = gin.id;
        let transactions = vec![
            tx(gin_id, TransactionType::OpeningStock, 10),
            tx(gin_id, TransactionType::Purchase, 5),
            tx(gin_id, TransactionType::Sales, 3),
            tx(Uuid::new_v4(), TransactionType::Purchase, 50),
        ];

        let levels = compute_stock_levels(vec![gin, tonic], &transactions, 4);
        assert_eq!(levels.len(), 2);

        assert_eq!(levels[0].stock_bottles, 12);
        assert_eq!(levels[0].stock_ml, 8400);
        assert!(!levels[0].low_stock);

        assert_eq!(levels[1].stock_bottles, 0);
        assert!(levels[1].low_stock);
    }

    #[test]
    fn test_edit_can_clear_text_fields() {
        let kept = Some("Metro Wholesale".to_string());
        assert_eq!(merge_text(None, kept.clone()), kept);
        assert_eq!(merge_text(Some("".to_string()), kept.clone()), None);
        assert_eq!(merge_text(Some("  ".to_string()), kept.clone()), None);
        assert_eq!(
            merge_text(Some("City Cellars".to_string()), kept),
            Some("City Cellars".to_string())
        );

        let input: UpdateTransactionInput = serde_json::from_str(r#"{"notes": ""}"#).unwrap();
        assert_eq!(merge_text(input.notes, Some("late delivery".to_string())), None);
        assert!(input.vendor.is_none());
    }

    #[test]
    fn test_record_input_accepts_glossary_labels() {
        let input: RecordTransactionInput = serde_json::from_str(
            r#"{
                "product_id": "00000000-0000-0000-0000-000000000001",
                "transaction_type": "Opening Stock",
                "quantity_bottles": 24
            }"#,
        )
        .unwrap();
        assert_eq!(input.transaction_type, TransactionType::OpeningStock);
        assert!(input.date.is_none());
    }

    #[test]
    fn test_record_input_rejects_fractional_quantity() {
        let result = serde_json::from_str::<RecordTransactionInput>(
            r#"{
                "product_id": "00000000-0000-0000-0000-000000000001",
                "transaction_type": "Sales",
                "quantity_bottles": 1.5
            }"#,
        );
        assert!(result.is_err());
    }
}
