//! Authentication endpoints

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppResult, AppState};

use super::{AuthenticatedAdmin, ValidatedJson};

/// Login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token, valid for the configured session lifetime
    pub token: String,
    #[serde(rename = "adminId")]
    pub admin_id: i32,
}

/// Identity bound to the presented token
#[derive(Serialize, ToSchema)]
pub struct AdminInfo {
    #[serde(rename = "adminId")]
    pub admin_id: i32,
    pub username: String,
    #[serde(rename = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Administrator login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, admin) = state
        .services
        .auth
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        admin_id: admin.id,
    }))
}

/// Current administrator
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated administrator", body = AdminInfo),
        (status = 401, description = "Missing, expired or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedAdmin(claims): AuthenticatedAdmin,
) -> AppResult<Json<AdminInfo>> {
    let admin = state.services.auth.current_admin(&claims).await?;

    Ok(Json(AdminInfo {
        admin_id: admin.id,
        username: admin.username,
        last_login: admin.last_login,
    }))
}
