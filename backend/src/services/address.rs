//! Address book service for vendor and customer records
//!
//! Addresses are tenant-owned; every lookup is scoped by the owning user so
//! one tenant can never reference another tenant's counterparties.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use shared::types::PersonKind;
use shared::validation::{validate_address_name, validate_location, validate_pincode};

/// Address service
#[derive(Clone)]
pub struct AddressService {
    db: PgPool,
}

/// Input for creating an address
#[derive(Debug, Deserialize)]
pub struct CreateAddressInput {
    pub address_name: String,
    pub type_id: i32,
    pub locations: String,
    pub pincode: String,
}

/// Address record joined with its person type
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AddressRow {
    pub address_id: i32,
    pub address_name: String,
    pub person_type: String,
    pub locations: String,
    pub pincode: i32,
    pub address_date: DateTime<Utc>,
}

/// Short address reference for dropdowns and filters
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AddressRef {
    pub address_id: i32,
    pub address_name: String,
}

/// Person type row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PersonType {
    pub type_id: i32,
    pub person_type: String,
}

impl AddressService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an address for the user
    pub async fn create(&self, user_id: i32, input: CreateAddressInput) -> AppResult<AddressRow> {
        validate_address_name(&input.address_name).map_err(|msg| AppError::Validation {
            field: "address_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_location(&input.locations).map_err(|msg| AppError::Validation {
            field: "locations".to_string(),
            message: msg.to_string(),
        })?;
        validate_pincode(&input.pincode).map_err(|msg| AppError::Validation {
            field: "pincode".to_string(),
            message: msg.to_string(),
        })?;
        let pincode: i32 = input.pincode.parse().map_err(|_| AppError::Validation {
            field: "pincode".to_string(),
            message: "Pincode must be 6-8 digits".to_string(),
        })?;

        let type_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM person_type WHERE type_id = $1",
        )
        .bind(input.type_id)
        .fetch_one(&self.db)
        .await?;

        if type_exists == 0 {
            return Err(AppError::Validation {
                field: "type_id".to_string(),
                message: "Unknown person type".to_string(),
            });
        }

        let address_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO address (address_name, type_id, locations, pincode, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING address_id
            "#,
        )
        .bind(&input.address_name)
        .bind(input.type_id)
        .bind(&input.locations)
        .bind(pincode)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        self.get(user_id, address_id).await
    }

    /// Fetch one of the user's addresses
    pub async fn get(&self, user_id: i32, address_id: i32) -> AppResult<AddressRow> {
        sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT a.address_id, a.address_name, pt.person_type, a.locations, a.pincode, a.address_date
            FROM address a
            JOIN person_type pt ON a.type_id = pt.type_id
            WHERE a.address_id = $1 AND a.user_id = $2
            "#,
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Address".to_string()))
    }

    /// List the user's addresses, newest first
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<AddressRow>> {
        let addresses = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT a.address_id, a.address_name, pt.person_type, a.locations, a.pincode, a.address_date
            FROM address a
            JOIN person_type pt ON a.type_id = pt.type_id
            WHERE a.user_id = $1
            ORDER BY a.address_date DESC, a.address_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(addresses)
    }

    /// List the user's addresses of one kind (vendors or customers)
    pub async fn list_by_kind(&self, user_id: i32, kind: PersonKind) -> AppResult<Vec<AddressRef>> {
        let addresses = sqlx::query_as::<_, AddressRef>(
            r#"
            SELECT a.address_id, a.address_name
            FROM address a
            JOIN person_type pt ON a.type_id = pt.type_id
            WHERE pt.person_type = $1 AND a.user_id = $2
            ORDER BY a.address_name ASC, a.address_id ASC
            "#,
        )
        .bind(kind.as_str())
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(addresses)
    }

    /// List all person types
    pub async fn person_types(&self) -> AppResult<Vec<PersonType>> {
        let types = sqlx::query_as::<_, PersonType>(
            "SELECT type_id, person_type FROM person_type ORDER BY type_id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(types)
    }

    /// Ensure an address belongs to the user
    pub async fn assert_owned(&self, user_id: i32, address_id: i32) -> AppResult<()> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM address WHERE address_id = $1 AND user_id = $2",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if count == 0 {
            return Err(AppError::NotFound("Address".to_string()));
        }
        Ok(())
    }

    /// Ensure an address belongs to the user and is of the given kind
    pub async fn assert_owned_kind(
        &self,
        user_id: i32,
        address_id: i32,
        kind: PersonKind,
    ) -> AppResult<()> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM address a
            JOIN person_type pt ON a.type_id = pt.type_id
            WHERE a.address_id = $1 AND a.user_id = $2 AND pt.person_type = $3
            "#,
        )
        .bind(address_id)
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_one(&self.db)
        .await?;

        if count == 0 {
            return Err(AppError::ValidationError(format!(
                "Invalid {} address selected",
                kind.as_str().to_lowercase()
            )));
        }
        Ok(())
    }
}
