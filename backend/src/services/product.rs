//! Product catalog service
//!
//! The catalog is a global dimension table shared by all tenants; only facts
//! (receipts and sales) are tenant-scoped.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use shared::validation::validate_product_name;

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub product_name: String,
}

/// Catalog row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub product_name: String,
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add a product to the catalog
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_product_name(&input.product_name).map_err(|msg| AppError::Validation {
            field: "product_name".to_string(),
            message: msg.to_string(),
        })?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO product (product_name)
            VALUES ($1)
            RETURNING product_id, product_name
            "#,
        )
        .bind(&input.product_name)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// List the catalog ordered by product id
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT product_id, product_name FROM product ORDER BY product_id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Ensure a product exists in the catalog
    pub async fn assert_exists(&self, product_id: i32) -> AppResult<()> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if count == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }
}
