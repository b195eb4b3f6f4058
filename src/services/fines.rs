//! Fine ledger service

use chrono::Utc;

use crate::{
    config::FinesConfig,
    error::AppResult,
    models::fine::{FineDetails, FinePayment},
    repository::Repository,
};

#[derive(Clone)]
pub struct FinesService {
    repository: Repository,
    config: FinesConfig,
}

impl FinesService {
    pub fn new(repository: Repository, config: FinesConfig) -> Self {
        Self { repository, config }
    }

    /// All fines of a reader
    pub async fn for_reader(&self, reader_id: i32) -> AppResult<Vec<FineDetails>> {
        self.repository.readers.get_by_id(reader_id).await?;
        self.repository.fines.for_reader(reader_id).await
    }

    /// Pay a fine. Paying twice succeeds and keeps the first payment time.
    pub async fn pay(&self, fine_id: i32) -> AppResult<FinePayment> {
        let payment = self.repository.fines.pay(fine_id).await?;
        tracing::info!(fine_id, amount = %payment.amount, "Fine paid");
        Ok(payment)
    }

    /// Accrue fines on every open overdue borrow record
    pub async fn assess_overdue(&self) -> AppResult<u64> {
        let assessed = self
            .repository
            .fines
            .assess_overdue(Utc::now(), self.config.daily_rate)
            .await?;

        tracing::info!(assessed, "Overdue fines assessed");

        Ok(assessed)
    }
}
