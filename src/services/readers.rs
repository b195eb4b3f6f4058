//! Reader directory service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::BorrowRecord,
        reader::{CreateReader, Pagination, Reader, ReaderPage, ReaderQuery, UpdateReader},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReadersService {
    repository: Repository,
}

impl ReadersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One page of readers with the total count
    pub async fn list(&self, query: &ReaderQuery) -> AppResult<ReaderPage> {
        let (page, limit) = query.resolve();

        let (data, total) = tokio::try_join!(
            self.repository.readers.list(limit, query.offset()),
            self.repository.readers.count(),
        )?;

        Ok(ReaderPage {
            data,
            pagination: Pagination { page, limit, total },
        })
    }

    /// Get reader by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reader> {
        self.repository.readers.get_by_id(id).await
    }

    /// Register a reader. Emails are unique regardless of case.
    pub async fn create(&self, reader: CreateReader) -> AppResult<Reader> {
        let email = reader.email.unwrap_or_default();

        if self.repository.readers.email_exists(&email, None).await? {
            return Err(duplicate_email());
        }

        let created = self
            .repository
            .readers
            .create(
                &reader.first_name.unwrap_or_default(),
                &reader.last_name.unwrap_or_default(),
                &email,
                reader.phone.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(map_unique_violation)?;

        tracing::info!(reader_id = created.id, "Reader registered");

        Ok(created)
    }

    /// Update an existing reader
    pub async fn update(&self, id: i32, reader: UpdateReader) -> AppResult<Reader> {
        if let Some(ref email) = reader.email {
            if self.repository.readers.email_exists(email, Some(id)).await? {
                return Err(duplicate_email());
            }
        }

        self.repository
            .readers
            .update(id, &reader)
            .await
            .map_err(map_unique_violation)
    }

    /// Delete a reader who holds no book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.readers.delete(id).await?;
        tracing::info!(reader_id = id, "Reader deleted");
        Ok(())
    }

    /// Borrow history of a reader
    pub async fn borrows(&self, id: i32) -> AppResult<Vec<BorrowRecord>> {
        self.repository.readers.get_by_id(id).await?;

        let now = Utc::now();
        let records = self.repository.borrows.for_reader(id).await?;
        Ok(records.into_iter().map(|r| r.into_record(now)).collect())
    }
}

fn duplicate_email() -> AppError {
    AppError::Validation("Email is already registered".to_string())
}

/// A concurrent registration can pass the pre-check; the unique index still rejects it.
fn map_unique_violation(e: AppError) -> AppError {
    if e.is_unique_violation() {
        duplicate_email()
    } else {
        e
    }
}
