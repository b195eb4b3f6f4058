//! Borrow ledger service

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    config::{FinesConfig, LoansConfig},
    error::AppResult,
    models::borrow::BorrowRecord,
    repository::Repository,
};

/// Receipt of a successful borrow
#[derive(Debug, Clone)]
pub struct BorrowReceipt {
    pub record_id: i32,
    pub due_date: DateTime<Utc>,
}

/// Receipt of a successful return
#[derive(Debug, Clone)]
pub struct ReturnReceipt {
    pub record: BorrowRecord,
    pub fine: Option<Decimal>,
}

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    loans: LoansConfig,
    fines: FinesConfig,
}

impl BorrowsService {
    pub fn new(repository: Repository, loans: LoansConfig, fines: FinesConfig) -> Self {
        Self {
            repository,
            loans,
            fines,
        }
    }

    /// Lend one copy of a book to a reader
    pub async fn borrow(&self, book_id: i32, reader_id: i32) -> AppResult<BorrowReceipt> {
        let now = Utc::now();
        let due_date = now + Duration::days(i64::from(self.loans.duration_days));

        let record_id = self
            .repository
            .borrows
            .borrow(book_id, reader_id, now, due_date)
            .await?;

        tracing::info!(record_id, book_id, reader_id, %due_date, "Book borrowed");

        Ok(BorrowReceipt {
            record_id,
            due_date,
        })
    }

    /// Return a borrowed copy, charging a fine when late
    pub async fn return_book(&self, record_id: i32) -> AppResult<ReturnReceipt> {
        let now = Utc::now();

        let outcome = self
            .repository
            .borrows
            .return_record(record_id, now, self.fines.daily_rate)
            .await?;

        match outcome.fine {
            Some(amount) => tracing::info!(
                record_id,
                book_id = outcome.record.book_id,
                %amount,
                "Book returned late, fine assessed"
            ),
            None => tracing::info!(record_id, book_id = outcome.record.book_id, "Book returned"),
        }

        let record = self.repository.borrows.get_by_id(record_id).await?;

        Ok(ReturnReceipt {
            record: record.into_record(now),
            fine: outcome.fine,
        })
    }

    /// Get borrow record by ID
    pub async fn get(&self, record_id: i32) -> AppResult<BorrowRecord> {
        let record = self.repository.borrows.get_by_id(record_id).await?;
        Ok(record.into_record(Utc::now()))
    }
}
