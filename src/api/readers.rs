//! Reader directory endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        borrow::BorrowRecord,
        reader::{CreateReader, Reader, ReaderPage, ReaderQuery, UpdateReader},
    },
    AppState,
};

use super::{ApiPath, ApiQuery, AuthenticatedAdmin, MessageResponse, ValidatedJson};

/// List readers with pagination
#[utoipa::path(
    get,
    path = "/readers",
    tag = "readers",
    params(ReaderQuery),
    responses(
        (status = 200, description = "One page of readers", body = ReaderPage)
    )
)]
pub async fn list_readers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReaderQuery>,
) -> AppResult<Json<ReaderPage>> {
    let page = state.services.readers.list(&query).await?;
    Ok(Json(page))
}

/// Get reader details by ID
#[utoipa::path(
    get,
    path = "/readers/{id}",
    tag = "readers",
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader details", body = Reader),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_reader(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Reader>> {
    let reader = state.services.readers.get_by_id(id).await?;
    Ok(Json(reader))
}

/// Register a new reader
#[utoipa::path(
    post,
    path = "/readers",
    tag = "readers",
    security(("bearer_auth" = [])),
    request_body = CreateReader,
    responses(
        (status = 201, description = "Reader created", body = Reader),
        (status = 400, description = "Invalid input or email already registered", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reader(
    State(state): State<AppState>,
    AuthenticatedAdmin(_claims): AuthenticatedAdmin,
    ValidatedJson(reader): ValidatedJson<CreateReader>,
) -> AppResult<(StatusCode, Json<Reader>)> {
    let created = state.services.readers.create(reader).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing reader
#[utoipa::path(
    put,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    request_body = UpdateReader,
    responses(
        (status = 200, description = "Reader updated", body = Reader),
        (status = 400, description = "Invalid input or email already registered", body = crate::error::ErrorResponse),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_reader(
    State(state): State<AppState>,
    AuthenticatedAdmin(_claims): AuthenticatedAdmin,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(reader): ValidatedJson<UpdateReader>,
) -> AppResult<Json<Reader>> {
    let updated = state.services.readers.update(id, reader).await?;
    Ok(Json(updated))
}

/// Delete a reader
#[utoipa::path(
    delete,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader deleted", body = MessageResponse),
        (status = 400, description = "Reader still holds borrowed books", body = crate::error::ErrorResponse),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_reader(
    State(state): State<AppState>,
    AuthenticatedAdmin(_claims): AuthenticatedAdmin,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.readers.delete(id).await?;
    Ok(Json(MessageResponse::new("Reader deleted")))
}

/// Borrow history of a reader
#[utoipa::path(
    get,
    path = "/readers/{id}/borrows",
    tag = "readers",
    params(
        ("id" = i32, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Borrow records, newest first", body = Vec<BorrowRecord>),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_reader_borrows(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let records = state.services.readers.borrows(id).await?;
    Ok(Json(records))
}
