//! HTTP handlers for the dashboard reporting endpoints
//!
//! Thin wrappers over the reporting service: parse and validate filter
//! parameters, run the read-only projection, serialize the result. Malformed
//! filters are rejected before any query runs.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::invoice::VendorQuery;
use crate::middleware::CurrentUser;
use crate::services::reporting::{MonthlySalesRow, SalesSummary};
use crate::services::ReportingService;
use crate::AppState;
use shared::aggregation::{
    BusinessSummary, LowStockRow, OverallSummary, ProductProfitRow, StockLevel, VendorProductRow,
    DEFAULT_LOW_STOCK_THRESHOLD,
};

/// Query parameters for the low-stock report
#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<String>,
}

impl LowStockQuery {
    /// Parse the threshold, defaulting when absent and rejecting non-numeric
    /// values
    pub fn parse_threshold(&self) -> AppResult<i64> {
        match self.threshold.as_deref() {
            None => Ok(DEFAULT_LOW_STOCK_THRESHOLD),
            Some(raw) => raw.parse::<i64>().map_err(|_| AppError::Validation {
                field: "threshold".to_string(),
                message: "Invalid stock threshold".to_string(),
            }),
        }
    }
}

/// Overall summary: total sales, estimated purchase cost, profit
pub async fn get_overall_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<OverallSummary>> {
    let service = ReportingService::new(state.db);
    let summary = service.overall_summary(current_user.0.user_id).await?;
    Ok(Json(summary))
}

/// Per-product profit breakdown for one vendor
pub async fn get_vendor_breakdown(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<VendorQuery>,
) -> AppResult<Json<Vec<VendorProductRow>>> {
    let vendor_id = query.parse_vendor_id()?;
    let service = ReportingService::new(state.db);
    let rows = service
        .vendor_breakdown(current_user.0.user_id, vendor_id)
        .await?;
    Ok(Json(rows))
}

/// Sales rollup across all invoices
pub async fn get_sales_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<SalesSummary>> {
    let service = ReportingService::new(state.db);
    let summary = service.sales_summary(current_user.0.user_id).await?;
    Ok(Json(summary))
}

/// Monthly sales buckets
pub async fn get_monthly_sales(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<MonthlySalesRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.monthly_sales(current_user.0.user_id).await?;
    Ok(Json(rows))
}

/// Stock level per catalog product
pub async fn get_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StockLevel>>> {
    let service = ReportingService::new(state.db);
    let rows = service.stock_levels(current_user.0.user_id).await?;
    Ok(Json(rows))
}

/// Stock level report as a CSV download
pub async fn export_inventory_csv(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let rows = service.stock_levels(current_user.0.user_id).await?;
    let csv_data = ReportingService::export_to_csv(&rows)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inventory.csv\"",
            ),
        ],
        csv_data,
    ))
}

/// Products below the stock threshold
pub async fn get_low_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<Vec<LowStockRow>>> {
    let threshold = query.parse_threshold()?;
    let service = ReportingService::new(state.db);
    let rows = service.low_stock(current_user.0.user_id, threshold).await?;
    Ok(Json(rows))
}

/// Cash-basis profit per product
pub async fn get_profit_by_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductProfitRow>>> {
    let service = ReportingService::new(state.db);
    let rows = service.profit_by_product(current_user.0.user_id).await?;
    Ok(Json(rows))
}

/// Tenant-wide cash totals
pub async fn get_business_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<BusinessSummary>> {
    let service = ReportingService::new(state.db);
    let summary = service.business_summary(current_user.0.user_id).await?;
    Ok(Json(summary))
}
