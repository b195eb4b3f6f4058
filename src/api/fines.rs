//! Fine ledger endpoints

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::fine::{FineDetails, FinePayment},
    AppState,
};

use super::{ApiPath, AuthenticatedAdmin};

/// Payment acknowledgement
#[derive(Serialize, ToSchema)]
pub struct PayFineResponse {
    pub message: String,
    pub fine: FinePayment,
}

/// Outcome of an assessment run
#[derive(Serialize, ToSchema)]
pub struct AssessResponse {
    /// Number of fines created or updated
    pub assessed: u64,
}

/// Fines of a reader
#[utoipa::path(
    get,
    path = "/fines/{reader_id}",
    tag = "fines",
    params(
        ("reader_id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Fines with book title and reader name", body = Vec<FineDetails>),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_reader_fines(
    State(state): State<AppState>,
    ApiPath(reader_id): ApiPath<i32>,
) -> AppResult<Json<Vec<FineDetails>>> {
    let fines = state.services.fines.for_reader(reader_id).await?;
    Ok(Json(fines))
}

/// Mark a fine as paid
#[utoipa::path(
    put,
    path = "/fines/pay/{fine_id}",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(
        ("fine_id" = i32, Path, description = "Fine ID")
    ),
    responses(
        (status = 200, description = "Fine paid", body = PayFineResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Fine not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn pay_fine(
    State(state): State<AppState>,
    AuthenticatedAdmin(_claims): AuthenticatedAdmin,
    ApiPath(fine_id): ApiPath<i32>,
) -> AppResult<Json<PayFineResponse>> {
    let fine = state.services.fines.pay(fine_id).await?;

    Ok(Json(PayFineResponse {
        message: "Fine paid".to_string(),
        fine,
    }))
}

/// Accrue fines on all overdue open borrows
#[utoipa::path(
    post,
    path = "/fines/assess",
    tag = "fines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assessment done", body = AssessResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn assess_fines(
    State(state): State<AppState>,
    AuthenticatedAdmin(_claims): AuthenticatedAdmin,
) -> AppResult<Json<AssessResponse>> {
    let assessed = state.services.fines.assess_overdue().await?;
    Ok(Json(AssessResponse { assessed }))
}
