//! Fines repository for database operations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::fine::{fine_amount, FineDetails, FinePayment, OverdueRecord},
};

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All fines of a reader, with book title and reader name
    pub async fn for_reader(&self, reader_id: i32) -> AppResult<Vec<FineDetails>> {
        let fines = sqlx::query_as::<_, FineDetails>(
            r#"
            SELECT f.id AS fine_id, f.record_id, f.amount, f.paid_status, f.paid_time,
                   b.title, r.first_name || ' ' || r.last_name AS reader_name
            FROM fines f
            JOIN borrow_records br ON f.record_id = br.id
            JOIN books b ON br.book_id = b.id
            JOIN readers r ON br.reader_id = r.id
            WHERE r.id = $1
            ORDER BY f.id
            "#,
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fines)
    }

    /// Mark a fine paid. A fine that is already paid keeps its original payment time.
    pub async fn pay(&self, fine_id: i32) -> AppResult<FinePayment> {
        sqlx::query_as::<_, FinePayment>(
            r#"
            UPDATE fines
            SET paid_status = TRUE,
                paid_time = COALESCE(paid_time, NOW())
            WHERE id = $1
            RETURNING id AS fine_id, amount, paid_status, paid_time
            "#,
        )
        .bind(fine_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", fine_id)))
    }

    /// Create or refresh the fine of a borrow record. Paid fines are left untouched.
    ///
    /// Returns true when a row was written.
    pub(crate) async fn upsert(
        con: &mut PgConnection,
        record_id: i32,
        amount: Decimal,
    ) -> AppResult<bool> {
        let written = sqlx::query(
            r#"
            INSERT INTO fines (record_id, amount, paid_status)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (record_id) DO UPDATE
            SET amount = EXCLUDED.amount
            WHERE fines.paid_status = FALSE
            "#,
        )
        .bind(record_id)
        .bind(amount)
        .execute(con)
        .await?
        .rows_affected();

        Ok(written > 0)
    }

    /// Accrue fines for every open borrow record past its due date.
    ///
    /// Records being returned concurrently are skipped; their return settles the fine.
    pub async fn assess_overdue(&self, now: DateTime<Utc>, daily_rate: Decimal) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let overdue = sqlx::query_as::<_, OverdueRecord>(
            r#"
            SELECT id, due_date
            FROM borrow_records
            WHERE return_date IS NULL AND due_date < $1
            ORDER BY id
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(now)
        .fetch_all(&mut *tx)
        .await?;

        let mut assessed = 0;
        for record in overdue {
            let amount = fine_amount(record.due_date, now, daily_rate);
            if amount > Decimal::ZERO && Self::upsert(&mut *tx, record.id, amount).await? {
                assessed += 1;
            }
        }

        tx.commit().await?;

        Ok(assessed)
    }
}
