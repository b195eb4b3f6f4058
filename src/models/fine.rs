//! Fine model and overdue fee computation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

const SECONDS_PER_DAY: i64 = 86_400;

/// Fine joined with the borrowed book and the reader
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FineDetails {
    #[serde(rename = "FineID")]
    pub fine_id: i32,
    #[serde(rename = "RecordID")]
    pub record_id: i32,
    #[serde(rename = "Amount")]
    #[schema(value_type = String, example = "1.50")]
    pub amount: Decimal,
    #[serde(rename = "PaidStatus")]
    pub paid_status: bool,
    #[serde(rename = "PaidTime")]
    pub paid_time: Option<DateTime<Utc>>,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "ReaderName")]
    pub reader_name: String,
}

/// Fine state after a payment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FinePayment {
    #[serde(rename = "FineID")]
    pub fine_id: i32,
    #[serde(rename = "Amount")]
    #[schema(value_type = String, example = "1.50")]
    pub amount: Decimal,
    #[serde(rename = "PaidStatus")]
    pub paid_status: bool,
    #[serde(rename = "PaidTime")]
    pub paid_time: Option<DateTime<Utc>>,
}

/// Open borrow record past its due date, candidate for assessment
#[derive(Debug, Clone, FromRow)]
pub struct OverdueRecord {
    pub id: i32,
    pub due_date: DateTime<Utc>,
}

/// Number of started days between `due_date` and `settled_at`; zero when on time.
pub fn days_overdue(due_date: DateTime<Utc>, settled_at: DateTime<Utc>) -> i64 {
    let late = (settled_at - due_date).num_seconds();
    if late <= 0 {
        return 0;
    }
    (late + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// `daily_rate × days_overdue`, rounded to cents
pub fn fine_amount(
    due_date: DateTime<Utc>,
    settled_at: DateTime<Utc>,
    daily_rate: Decimal,
) -> Decimal {
    (daily_rate * Decimal::from(days_overdue(due_date, settled_at))).round_dp(2)
}
