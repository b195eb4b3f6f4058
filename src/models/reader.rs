//! Reader model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::trimmed;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Reader record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reader {
    #[serde(rename = "ReaderID")]
    pub id: i32,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "RegDate")]
    pub reg_date: DateTime<Utc>,
}

/// Reader list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ReaderQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Readers per page (1 to 100)
    pub limit: Option<i64>,
}

impl ReaderQuery {
    /// Clamped `(page, limit)`
    pub fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }

    pub fn offset(&self) -> i64 {
        let (page, limit) = self.resolve();
        (page - 1).saturating_mul(limit)
    }
}

/// Create reader request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReader {
    #[serde(rename = "FirstName", default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "FirstName is required"),
        length(min = 1, max = 100, message = "FirstName must be 1 to 100 characters")
    )]
    pub first_name: Option<String>,
    #[serde(rename = "LastName", default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "LastName is required"),
        length(min = 1, max = 100, message = "LastName must be 1 to 100 characters")
    )]
    pub last_name: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Email is required"),
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "trimmed")]
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,
}

/// Update reader request. Absent fields keep their current value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReader {
    #[serde(rename = "FirstName", default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "FirstName must be 1 to 100 characters"))]
    pub first_name: Option<String>,
    #[serde(rename = "LastName", default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "LastName must be 1 to 100 characters"))]
    pub last_name: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "trimmed")]
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "trimmed")]
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,
}

/// Pagination block of a list response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// Paginated reader list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReaderPage {
    pub data: Vec<Reader>,
    pub pagination: Pagination,
}
