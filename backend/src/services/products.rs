//! Product catalog service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{validate_ml_per_bottle, validate_product_label, Product};

const PRODUCT_COLUMNS: &str =
    "id, category, sub_category, name, ml_per_bottle, created_at, updated_at";

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

#[derive(Debug, Clone, FromRow)]
struct ProductRecord {
    id: Uuid,
    category: String,
    sub_category: String,
    name: String,
    ml_per_bottle: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Product {
            id: record.id,
            category: record.category,
            sub_category: record.sub_category,
            name: record.name,
            ml_per_bottle: record.ml_per_bottle,
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        }
    }
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub category: String,
    pub sub_category: String,
    pub name: String,
    pub ml_per_bottle: i32,
}

/// Input for correcting a product
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductInput {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub name: Option<String>,
    pub ml_per_bottle: Option<i32>,
}

impl CreateProductInput {
    fn validate(&self) -> AppResult<()> {
        validate_product_label(&self.category).map_err(|m| AppError::validation("category", m))?;
        validate_product_label(&self.sub_category)
            .map_err(|m| AppError::validation("sub_category", m))?;
        validate_product_label(&self.name).map_err(|m| AppError::validation("name", m))?;
        validate_ml_per_bottle(self.ml_per_bottle)
            .map_err(|m| AppError::validation("ml_per_bottle", m))?;
        Ok(())
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all products ordered for display
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let records = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {} FROM products ORDER BY category, sub_category, name",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(records.into_iter().map(Product::from).collect())
    }

    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(record.into())
    }

    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;

        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            INSERT INTO products (category, sub_category, name, ml_per_bottle)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(input.category.trim())
        .bind(input.sub_category.trim())
        .bind(input.name.trim())
        .bind(input.ml_per_bottle)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = %record.id, name = %record.name, "Created product");
        Ok(record.into())
    }

    /// Correct a product. Milliliters already stored on transactions are left as written.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(product_id).await?;

        let merged = CreateProductInput {
            category: input.category.unwrap_or(existing.category),
            sub_category: input.sub_category.unwrap_or(existing.sub_category),
            name: input.name.unwrap_or(existing.name),
            ml_per_bottle: input.ml_per_bottle.unwrap_or(existing.ml_per_bottle),
        };
        merged.validate()?;

        let record = sqlx::query_as::<_, ProductRecord>(&format!(
            r#"
            UPDATE products
            SET category = $1, sub_category = $2, name = $3, ml_per_bottle = $4
            WHERE id = $5
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(merged.category.trim())
        .bind(merged.sub_category.trim())
        .bind(merged.name.trim())
        .bind(merged.ml_per_bottle)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = %product_id, "Updated product");
        Ok(record.into())
    }

    /// Delete a product together with its transactions
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(product_id = %product_id, "Deleted product");
        Ok(())
    }
}
