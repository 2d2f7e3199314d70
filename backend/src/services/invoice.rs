//! Invoice service
//!
//! An invoice is billed to a customer address and carries a single sale line.
//! The sale may optionally be linked to the vendor the goods originally came
//! from, which feeds the per-vendor profit breakdown.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::{AddressService, ProductService};
use shared::types::PersonKind;
use shared::validation::{validate_amount, validate_quantity};

/// Invoice service
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
}

/// Input for creating an invoice with its sale line
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceInput {
    pub customer_address_id: i32,
    pub vendor_address_id: Option<i32>,
    pub product_id: i32,
    pub sale_quantity: i64,
    pub sale_amount: Decimal,
}

/// Response after creating an invoice
#[derive(Debug, Serialize)]
pub struct CreatedInvoice {
    pub invoice_id: i32,
    pub sale_id: i32,
}

/// Invoice line joined across invoice, sale, product, and addresses
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceRow {
    pub invoice_id: i32,
    pub invoice_date: DateTime<Utc>,
    pub customer_address: String,
    pub sale_id: i32,
    pub product_name: String,
    pub sale_quantity: i32,
    pub sale_amount: Decimal,
    pub vendor_address: Option<String>,
}

/// Product supplied by a vendor, with the average received row amount
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VendorCatalogRow {
    pub product_id: i32,
    pub product_name: String,
    pub received_price: Decimal,
}

impl InvoiceService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an invoice and its sale line in one transaction
    pub async fn create(&self, user_id: i32, input: CreateInvoiceInput) -> AppResult<CreatedInvoice> {
        validate_amount(input.sale_amount).map_err(|msg| AppError::Validation {
            field: "sale_amount".to_string(),
            message: msg.to_string(),
        })?;
        validate_quantity(input.sale_quantity).map_err(|msg| AppError::Validation {
            field: "sale_quantity".to_string(),
            message: msg.to_string(),
        })?;
        let quantity = i32::try_from(input.sale_quantity).map_err(|_| AppError::Validation {
            field: "sale_quantity".to_string(),
            message: "Quantity is too large".to_string(),
        })?;

        let addresses = AddressService::new(self.db.clone());
        addresses
            .assert_owned_kind(user_id, input.customer_address_id, PersonKind::Customer)
            .await?;
        if let Some(vendor_id) = input.vendor_address_id {
            addresses
                .assert_owned_kind(user_id, vendor_id, PersonKind::Vendor)
                .await?;
        }
        ProductService::new(self.db.clone())
            .assert_exists(input.product_id)
            .await?;

        let mut tx = self.db.begin().await?;

        let invoice_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO invoice (address_id, user_id) VALUES ($1, $2) RETURNING invoice_id",
        )
        .bind(input.customer_address_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let sale_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO sale (invoice_id, product_id, grn_id, vendor_address_id, sale_amount, sale_quantity, user_id)
            VALUES ($1, $2, NULL, $3, $4, $5, $6)
            RETURNING sale_id
            "#,
        )
        .bind(invoice_id)
        .bind(input.product_id)
        .bind(input.vendor_address_id)
        .bind(input.sale_amount)
        .bind(quantity)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CreatedInvoice { invoice_id, sale_id })
    }

    /// List the user's invoice lines, newest first
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<InvoiceRow>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT i.invoice_id, i.invoice_date, c.address_name AS customer_address,
                   s.sale_id, p.product_name, s.sale_quantity, s.sale_amount,
                   v.address_name AS vendor_address
            FROM invoice i
            JOIN sale s ON s.invoice_id = i.invoice_id
            JOIN product p ON s.product_id = p.product_id
            LEFT JOIN address v ON s.vendor_address_id = v.address_id
            JOIN address c ON i.address_id = c.address_id
            WHERE i.user_id = $1
            ORDER BY i.invoice_date DESC, s.sale_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Distinct products received from a vendor, with the average GRN row
    /// amount as an indicative price
    pub async fn vendor_products(
        &self,
        user_id: i32,
        vendor_id: i32,
    ) -> AppResult<Vec<VendorCatalogRow>> {
        let rows = sqlx::query_as::<_, VendorCatalogRow>(
            r#"
            SELECT p.product_id, p.product_name,
                   COALESCE(AVG(g.grn_amount), 0) AS received_price
            FROM product p
            JOIN grn g ON p.product_id = g.product_id
            WHERE g.address_id = $1 AND g.user_id = $2
            GROUP BY p.product_id, p.product_name
            ORDER BY p.product_name ASC, p.product_id ASC
            "#,
        )
        .bind(vendor_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
