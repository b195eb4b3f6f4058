//! Borrow record model and status derivation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Lending state of a borrow record.
///
/// Never stored: computed from the record dates each time it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BorrowStatus {
    Borrowed,
    Overdue,
    Returned,
}

impl BorrowStatus {
    pub fn derive(
        due_date: DateTime<Utc>,
        return_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match return_date {
            Some(_) => BorrowStatus::Returned,
            None if now > due_date => BorrowStatus::Overdue,
            None => BorrowStatus::Borrowed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "BORROWED",
            BorrowStatus::Overdue => "OVERDUE",
            BorrowStatus::Returned => "RETURNED",
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Borrow record row joined with the book title
#[derive(Debug, Clone, FromRow)]
pub struct BorrowRecordRow {
    pub id: i32,
    pub book_id: i32,
    pub reader_id: i32,
    pub title: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecordRow {
    pub fn into_record(self, now: DateTime<Utc>) -> BorrowRecord {
        BorrowRecord {
            status: BorrowStatus::derive(self.due_date, self.return_date, now),
            record_id: self.id,
            book_id: self.book_id,
            reader_id: self.reader_id,
            title: self.title,
            borrow_date: self.borrow_date,
            due_date: self.due_date,
            return_date: self.return_date,
        }
    }
}

/// Borrow record as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowRecord {
    #[serde(rename = "RecordID")]
    pub record_id: i32,
    #[serde(rename = "BookID")]
    pub book_id: i32,
    #[serde(rename = "ReaderID")]
    pub reader_id: i32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "BorrowDate")]
    pub borrow_date: DateTime<Utc>,
    #[serde(rename = "DueDate")]
    pub due_date: DateTime<Utc>,
    #[serde(rename = "ReturnDate")]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(rename = "Status")]
    pub status: BorrowStatus,
}

/// Record closed by a return
#[derive(Debug, Clone, FromRow)]
pub struct ClosedRecord {
    pub id: i32,
    pub book_id: i32,
    pub due_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
}

/// Borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrow {
    #[serde(rename = "BookID")]
    #[validate(required(message = "BookID is required"))]
    pub book_id: Option<i32>,
    #[serde(rename = "ReaderID")]
    #[validate(required(message = "ReaderID is required"))]
    pub reader_id: Option<i32>,
}
