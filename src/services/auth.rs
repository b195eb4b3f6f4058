//! Administrator authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::admin::{Admin, AdminClaims},
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate an administrator and return a signed session token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, Admin)> {
        let admin = self
            .repository
            .admins
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&admin.password, password)? {
            tracing::info!(username, "Login rejected: wrong password");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let claims = AdminClaims::new(&admin, Utc::now(), self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        self.repository.admins.touch_last_login(admin.id).await?;

        tracing::info!(admin_id = admin.id, "Admin logged in");

        Ok((token, admin))
    }

    /// Resolve the administrator bound to a verified token
    pub async fn current_admin(&self, claims: &AdminClaims) -> AppResult<Admin> {
        self.repository
            .admins
            .get_by_id(claims.admin_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::Authentication("Token refers to an unknown admin".to_string())
                }
                other => other,
            })
    }

    /// Create the configured administrator when no administrator exists yet
    pub async fn ensure_bootstrap_admin(&self, config: &AdminConfig) -> AppResult<Option<Admin>> {
        let Some(ref password) = config.bootstrap_password else {
            return Ok(None);
        };

        if self.repository.admins.count().await? > 0 {
            return Ok(None);
        }

        let hash = hash_password(password)?;
        let admin = self
            .repository
            .admins
            .create(&config.bootstrap_username, &hash)
            .await?;

        tracing::warn!(
            username = %admin.username,
            "Created bootstrap admin account; change its password"
        );

        Ok(Some(admin))
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
