//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{BookSummary, Category, CreateBook, Publisher},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every book
    pub async fn list_books(&self) -> AppResult<Vec<BookSummary>> {
        self.repository.books.list().await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<BookSummary> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn create_book(&self, book: CreateBook) -> AppResult<BookSummary> {
        let book = book.into_new_book();
        let id = self.repository.books.create(&book).await?;

        tracing::info!(book_id = id, copies = book.total_qty, "Book added to catalog");

        self.repository.books.get_by_id(id).await
    }

    pub async fn publishers(&self) -> AppResult<Vec<Publisher>> {
        self.repository.books.publishers().await
    }

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.repository.books.categories().await
    }
}
