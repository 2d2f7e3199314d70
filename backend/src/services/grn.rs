//! Goods-received note (GRN) service
//!
//! A GRN records stock received from a vendor address: a whole-unit quantity
//! and the total amount paid for the row. Amounts are row totals, never unit
//! prices; the aggregation engine derives average unit cost from the sums.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::{AddressService, ProductService};
use shared::validation::{validate_amount, validate_quantity};

/// GRN service
#[derive(Clone)]
pub struct GrnService {
    db: PgPool,
}

/// Input for recording a goods receipt
#[derive(Debug, Deserialize)]
pub struct CreateGrnInput {
    pub address_id: i32,
    pub product_id: i32,
    pub grn_amount: Decimal,
    pub grn_quantity: i64,
}

/// GRN record joined with product and address
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GrnRow {
    pub grn_id: i32,
    pub grn_amount: Decimal,
    pub grn_quantity: i32,
    pub grn_date: DateTime<Utc>,
    pub product_name: String,
    pub address_name: String,
    pub person_type: String,
}

/// Response after recording a receipt
#[derive(Debug, Serialize)]
pub struct CreatedGrn {
    pub grn_id: i32,
}

impl GrnService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a goods receipt against one of the user's addresses
    pub async fn create(&self, user_id: i32, input: CreateGrnInput) -> AppResult<CreatedGrn> {
        validate_amount(input.grn_amount).map_err(|msg| AppError::Validation {
            field: "grn_amount".to_string(),
            message: msg.to_string(),
        })?;
        validate_quantity(input.grn_quantity).map_err(|msg| AppError::Validation {
            field: "grn_quantity".to_string(),
            message: msg.to_string(),
        })?;
        let quantity = i32::try_from(input.grn_quantity).map_err(|_| AppError::Validation {
            field: "grn_quantity".to_string(),
            message: "Quantity is too large".to_string(),
        })?;

        // The receiving address must belong to the current user
        AddressService::new(self.db.clone())
            .assert_owned(user_id, input.address_id)
            .await?;
        ProductService::new(self.db.clone())
            .assert_exists(input.product_id)
            .await?;

        let grn_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO grn (address_id, product_id, grn_amount, grn_quantity, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING grn_id
            "#,
        )
        .bind(input.address_id)
        .bind(input.product_id)
        .bind(input.grn_amount)
        .bind(quantity)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(CreatedGrn { grn_id })
    }

    /// List the user's GRNs, newest first
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<GrnRow>> {
        let grns = sqlx::query_as::<_, GrnRow>(
            r#"
            SELECT g.grn_id, g.grn_amount, g.grn_quantity, g.grn_date,
                   p.product_name, a.address_name, pt.person_type
            FROM grn g
            JOIN product p ON g.product_id = p.product_id
            JOIN address a ON g.address_id = a.address_id
            JOIN person_type pt ON a.type_id = pt.type_id
            WHERE g.user_id = $1
            ORDER BY g.grn_date DESC, g.grn_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(grns)
    }
}
