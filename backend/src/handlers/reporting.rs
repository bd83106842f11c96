//! Reporting handlers for dashboard charts and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reporting::{DailyTotals, DashboardMetrics, ReportFilter, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Get dashboard metrics
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let threshold = state.config.inventory.low_stock_threshold;
    let service = ReportingService::new(state.db.clone());
    let metrics = service.get_dashboard_metrics(threshold).await?;
    Ok(Json(metrics))
}

/// Get per-product movement summary
pub async fn get_product_summary(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.db.clone());
    let data = service.get_product_summary().await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"inventory_summary.csv\""),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Get per-day totals for the transaction chart
pub async fn get_daily_report(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<DailyTotals>>> {
    let service = ReportingService::new(state.db.clone());
    let data = service.get_daily_series(&filter).await?;
    Ok(Json(data))
}
