//! Borrow ledger endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowRecord, CreateBorrow},
    AppState,
};

use super::{ApiPath, AuthenticatedAdmin, ValidatedJson};

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    #[serde(rename = "recordId")]
    pub record_id: i32,
    #[serde(rename = "dueDate")]
    pub due_date: DateTime<Utc>,
    pub message: String,
}

/// Return response with the closed record
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    pub record: BorrowRecord,
    /// Fine charged for a late return
    #[schema(value_type = Option<String>, example = "1.50")]
    pub fine: Option<Decimal>,
}

/// Borrow a book for a reader
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "borrow",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 400, description = "Missing fields or no copy in stock", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_borrow(
    State(state): State<AppState>,
    AuthenticatedAdmin(_claims): AuthenticatedAdmin,
    ValidatedJson(request): ValidatedJson<CreateBorrow>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let (Some(book_id), Some(reader_id)) = (request.book_id, request.reader_id) else {
        return Err(AppError::Validation("BookID and ReaderID are required".to_string()));
    };

    let receipt = state.services.borrows.borrow(book_id, reader_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            record_id: receipt.record_id,
            due_date: receipt.due_date,
            message: "Book borrowed".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    put,
    path = "/borrow/return/{id}",
    tag = "borrow",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Record already returned", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedAdmin(_claims): AuthenticatedAdmin,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let receipt = state.services.borrows.return_book(id).await?;

    let message = match receipt.fine {
        Some(amount) => format!("Book returned late, fine of {} assessed", amount),
        None => "Book returned".to_string(),
    };

    Ok(Json(ReturnResponse {
        message,
        record: receipt.record,
        fine: receipt.fine,
    }))
}

/// Get a borrow record
#[utoipa::path(
    get,
    path = "/borrow/{id}",
    tag = "borrow",
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow record", body = BorrowRecord),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_borrow(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state.services.borrows.get(id).await?;
    Ok(Json(record))
}
