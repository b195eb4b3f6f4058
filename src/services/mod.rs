//! Business logic services

pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod fines;
pub mod readers;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub readers: readers::ReadersService,
    pub borrows: borrows::BorrowsService,
    pub fines: fines::FinesService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            readers: readers::ReadersService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(
                repository.clone(),
                config.loans.clone(),
                config.fines.clone(),
            ),
            fines: fines::FinesService::new(repository.clone(), config.fines.clone()),
            repository,
        }
    }
}
