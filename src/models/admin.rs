//! Administrator model and session credentials

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Administrator account from database
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    pub password: String,
    pub last_login: Option<DateTime<Utc>>,
}

/// JWT Claims for an authenticated administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub admin_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl AdminClaims {
    pub fn new(admin: &Admin, issued_at: DateTime<Utc>, lifetime_hours: u64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: admin.username.clone(),
            admin_id: admin.id,
            exp: iat + (lifetime_hours as i64 * 3600),
            iat,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        // Sessions end exactly at `exp`
        let mut validation = Validation::default();
        validation.leeway = 0;
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }

    /// Parse a bearer token, reporting expiry separately from any other defect
    pub fn verify(token: &str, secret: &str) -> Result<Self, AppError> {
        Self::from_token(token, secret).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                AppError::Authentication("Token has expired".to_string())
            }
            _ => AppError::Authentication("Invalid token".to_string()),
        })
    }
}
