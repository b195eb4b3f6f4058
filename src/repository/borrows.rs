//! Borrow ledger repository: stock and borrow records move together

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowRecordRow, ClosedRecord},
        fine::fine_amount,
    },
};

use super::fines::FinesRepository;

const RECORD_SELECT: &str = r#"
    SELECT br.id, br.book_id, br.reader_id, b.title,
           br.borrow_date, br.due_date, br.return_date
    FROM borrow_records br
    JOIN books b ON br.book_id = b.id
"#;

/// Outcome of a return
#[derive(Debug, Clone)]
pub struct ReturnOutcome {
    pub record: ClosedRecord,
    /// Fine assessed for a late return
    pub fine: Option<Decimal>,
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecordRow> {
        sqlx::query_as::<_, BorrowRecordRow>(&format!("{} WHERE br.id = $1", RECORD_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// All borrow records of a reader, newest first
    pub async fn for_reader(&self, reader_id: i32) -> AppResult<Vec<BorrowRecordRow>> {
        let records = sqlx::query_as::<_, BorrowRecordRow>(&format!(
            "{} WHERE br.reader_id = $1 ORDER BY br.borrow_date DESC, br.id DESC",
            RECORD_SELECT
        ))
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Take one copy off the shelf and open a borrow record, atomically.
    ///
    /// The conditional decrement locks the book row, so concurrent borrows of
    /// the last copy queue behind each other and only the first one succeeds.
    pub async fn borrow(
        &self,
        book_id: i32,
        reader_id: i32,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM readers WHERE id = $1 FOR SHARE")
            .bind(reader_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reader with id {} not found", reader_id)))?;

        let taken = sqlx::query(
            r#"
            UPDATE books
            SET current_qty = current_qty - 1
            WHERE id = $1 AND current_qty > 0
            "#,
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if taken == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;

            return Err(if exists {
                AppError::OutOfStock(format!("No copy of book {} is available", book_id))
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        }

        let record_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO borrow_records (book_id, reader_id, borrow_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(book_id)
        .bind(reader_id)
        .bind(borrow_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record_id)
    }

    /// Close an open borrow record, put the copy back and settle any late fee, atomically.
    pub async fn return_record(
        &self,
        record_id: i32,
        returned_at: DateTime<Utc>,
        daily_rate: Decimal,
    ) -> AppResult<ReturnOutcome> {
        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query_as::<_, ClosedRecord>(
            r#"
            UPDATE borrow_records
            SET return_date = $2
            WHERE id = $1 AND return_date IS NULL
            RETURNING id, book_id, due_date, return_date
            "#,
        )
        .bind(record_id)
        .bind(returned_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(closed) = closed else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM borrow_records WHERE id = $1)")
                    .bind(record_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if exists {
                AppError::Conflict(format!("Borrow record {} was already returned", record_id))
            } else {
                AppError::NotFound(format!("Borrow record with id {} not found", record_id))
            });
        };

        let restocked = sqlx::query(
            r#"
            UPDATE books
            SET current_qty = current_qty + 1
            WHERE id = $1 AND current_qty < total_qty
            "#,
        )
        .bind(closed.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if restocked == 0 {
            tracing::warn!(
                book_id = closed.book_id,
                record_id,
                "Returned copy not restocked: book already at full stock"
            );
        }

        let amount = fine_amount(closed.due_date, closed.return_date, daily_rate);
        let fine = if amount > Decimal::ZERO {
            FinesRepository::upsert(&mut *tx, closed.id, amount).await?;
            Some(amount)
        } else {
            None
        };

        tx.commit().await?;

        Ok(ReturnOutcome { record: closed, fine })
    }

    /// Count open borrow records of one book
    pub async fn count_open_for_book(&self, book_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
