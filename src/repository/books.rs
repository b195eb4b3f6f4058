//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{BookSummary, Category, NewBook, Publisher, Stock},
};

const SUMMARY_SELECT: &str = r#"
    SELECT b.id AS book_id, b.title, b.isbn, b.cover_url,
           p.name AS publisher,
           STRING_AGG(c.name, ', ' ORDER BY c.name) AS categories,
           b.current_qty, b.total_qty
    FROM books b
    JOIN publishers p ON b.pub_id = p.id
    LEFT JOIN book_categories bc ON b.id = bc.book_id
    LEFT JOIN categories c ON bc.cat_id = c.id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every book with publisher and categories
    pub async fn list(&self) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(&format!(
            "{} GROUP BY b.id, p.name ORDER BY b.id",
            SUMMARY_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookSummary> {
        sqlx::query_as::<_, BookSummary>(&format!(
            "{} WHERE b.id = $1 GROUP BY b.id, p.name",
            SUMMARY_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Current stock counters of a book
    pub async fn stock(&self, id: i32) -> AppResult<Stock> {
        sqlx::query_as::<_, Stock>("SELECT current_qty, total_qty FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Insert a book and its category links. All copies start on the shelf.
    pub async fn create(&self, book: &NewBook) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        let publisher_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM publishers WHERE id = $1)")
                .bind(book.pub_id)
                .fetch_one(&mut *tx)
                .await?;

        if !publisher_exists {
            return Err(AppError::Validation(format!(
                "Publisher with id {} does not exist",
                book.pub_id
            )));
        }

        if !book.category_ids.is_empty() {
            let known: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE id = ANY($1)")
                    .bind(&book.category_ids)
                    .fetch_one(&mut *tx)
                    .await?;

            if known != book.category_ids.len() as i64 {
                return Err(AppError::Validation(
                    "One or more categories do not exist".to_string(),
                ));
            }
        }

        let book_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, isbn, pub_id, cover_url, current_qty, total_qty)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.pub_id)
        .bind(&book.cover_url)
        .bind(book.total_qty)
        .fetch_one(&mut *tx)
        .await?;

        if !book.category_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO book_categories (book_id, cat_id)
                SELECT $1, UNNEST($2::int[])
                "#,
            )
            .bind(book_id)
            .bind(&book.category_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(book_id)
    }

    /// List publishers
    pub async fn publishers(&self) -> AppResult<Vec<Publisher>> {
        let publishers =
            sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(publishers)
    }

    /// List categories
    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }
}
