//! Authentication service for user registration, login, and token issuance

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::validation::{validate_password, validate_user_name};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// Input for registering a new user
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
    pub role_id: i32,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i32,
    pub user_name: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub user_name: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued access token
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: i32,
    pub user_name: String,
    pub passwords: String,
}

/// Role row
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Role {
    pub role_id: i32,
    pub role_name: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Register a new user with a bcrypt-hashed password
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisterResponse> {
        validate_user_name(&input.user_name).map_err(|msg| AppError::Validation {
            field: "user_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;

        // Role must exist
        let role_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM roles WHERE role_id = $1",
        )
        .bind(input.role_id)
        .fetch_one(&self.db)
        .await?;

        if role_exists == 0 {
            return Err(AppError::Validation {
                field: "role_id".to_string(),
                message: "Unknown role".to_string(),
            });
        }

        // User names are unique
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE user_name = $1",
        )
        .bind(&input.user_name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("user_name".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (user_name, passwords, role_id)
            VALUES ($1, $2, $3)
            RETURNING user_id
            "#,
        )
        .bind(&input.user_name)
        .bind(&password_hash)
        .bind(input.role_id)
        .fetch_one(&self.db)
        .await?;

        Ok(RegisterResponse {
            user_id,
            user_name: input.user_name,
        })
    }

    /// Authenticate user with user name and password
    pub async fn login(&self, user_name: &str, password: &str) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, user_name, passwords FROM users WHERE user_name = $1",
        )
        .bind(user_name)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &user.passwords)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.generate_token(user.user_id, &user.user_name)
    }

    /// List available roles
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT role_id, role_name FROM roles ORDER BY role_id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(roles)
    }

    /// Generate a signed access token for a user
    pub fn generate_token(&self, user_id: i32, user_name: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            user_name: user_name.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}
