//! HTTP handlers for invoices and sales

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::invoice::{CreateInvoiceInput, CreatedInvoice, InvoiceRow, VendorCatalogRow};
use crate::services::InvoiceService;
use crate::AppState;

/// Query parameters carrying a vendor filter
#[derive(Debug, Deserialize)]
pub struct VendorQuery {
    pub vendor_id: Option<String>,
}

impl VendorQuery {
    /// Parse the vendor id, rejecting missing or non-numeric values
    pub fn parse_vendor_id(&self) -> AppResult<i32> {
        self.vendor_id
            .as_deref()
            .and_then(|v| v.parse::<i32>().ok())
            .ok_or_else(|| AppError::Validation {
                field: "vendor_id".to_string(),
                message: "Invalid vendor id".to_string(),
            })
    }
}

/// Create an invoice with its sale line
pub async fn create_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateInvoiceInput>,
) -> AppResult<(StatusCode, Json<CreatedInvoice>)> {
    let service = InvoiceService::new(state.db);
    let created = service.create(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the current user's invoice lines
pub async fn list_invoices(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<InvoiceRow>>> {
    let service = InvoiceService::new(state.db);
    let rows = service.list(current_user.0.user_id).await?;
    Ok(Json(rows))
}

/// Products supplied by a vendor, for the invoice form
pub async fn vendor_catalog(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<VendorQuery>,
) -> AppResult<Json<Vec<VendorCatalogRow>>> {
    let vendor_id = query.parse_vendor_id()?;
    let service = InvoiceService::new(state.db);
    let rows = service
        .vendor_products(current_user.0.user_id, vendor_id)
        .await?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(vendor_id: Option<&str>) -> VendorQuery {
        VendorQuery {
            vendor_id: vendor_id.map(str::to_string),
        }
    }

    #[test]
    fn numeric_vendor_id_parses() {
        assert_eq!(query(Some("42")).parse_vendor_id().unwrap(), 42);
    }

    #[test]
    fn missing_vendor_id_is_a_validation_error() {
        let err = query(None).parse_vendor_id().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "vendor_id"));
    }

    #[test]
    fn non_numeric_vendor_id_is_a_validation_error() {
        for raw in ["abc", "12x", "1.5", ""] {
            let err = query(Some(raw)).parse_vendor_id().unwrap_err();
            assert!(matches!(err, AppError::Validation { ref field, .. } if field == "vendor_id"));
        }
    }
}
