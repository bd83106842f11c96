//! HTTP handlers for inventory transactions and stock levels

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{
    InventoryService, ProductLedger, RecordTransactionInput, TransactionFilter,
    UpdateTransactionInput,
};
use crate::AppState;
use shared::{InventoryTransaction, StockLevel};

/// List transactions, optionally filtered by product and date range
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<Vec<InventoryTransaction>>> {
    let service = InventoryService::new(state.db);
    let transactions = service.list_transactions(&filter).await?;
    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<InventoryTransaction>> {
    let service = InventoryService::new(state.db);
    let transaction = service.get_transaction(transaction_id).await?;
    Ok(Json(transaction))
}

/// Record an inventory transaction
pub async fn record_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordTransactionInput>,
) -> AppResult<(StatusCode, Json<InventoryTransaction>)> {
    let service = InventoryService::new(state.db);
    let transaction = service
        .record_transaction(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(input): Json<UpdateTransactionInput>,
) -> AppResult<Json<InventoryTransaction>> {
    let service = InventoryService::new(state.db);
    let transaction = service.update_transaction(transaction_id, input).await?;
    Ok(Json(transaction))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = InventoryService::new(state.db);
    service.delete_transaction(transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current stock for every product
pub async fn get_stock_levels(State(state): State<AppState>) -> AppResult<Json<Vec<StockLevel>>> {
    let threshold = state.config.inventory.low_stock_threshold;
    let service = InventoryService::new(state.db);
    let levels = service.stock_levels(threshold).await?;
    Ok(Json(levels))
}

/// Stock and running ledger for one product
pub async fn get_product_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductLedger>> {
    let threshold = state.config.inventory.low_stock_threshold;
    let service = InventoryService::new(state.db);
    let ledger = service.product_ledger(product_id, threshold).await?;
    Ok(Json(ledger))
}

/// Products at or below the low-stock threshold
pub async fn get_low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<StockLevel>>> {
    let threshold = state.config.inventory.low_stock_threshold;
    let service = InventoryService::new(state.db);
    let levels = service.low_stock(threshold).await?;
    Ok(Json(levels))
}
