//! Ledger tests against a real database

use chrono::{Duration, Utc};
use libris_server::{
    config::AppConfig,
    error::AppError,
    models::{
        book::CreateBook,
        borrow::BorrowStatus,
        reader::{CreateReader, Reader, ReaderQuery, UpdateReader},
    },
    repository::Repository,
    services::{auth::hash_password, Services},
};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use tokio::task::JoinSet;

async fn setup() -> (Services, Repository) {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| AppConfig::default().database.url);

    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), &AppConfig::default());
    (services, repository)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

async fn publisher(repository: &Repository) -> i32 {
    sqlx::query_scalar("INSERT INTO publishers (name) VALUES ($1) RETURNING id")
        .bind(unique("publisher"))
        .fetch_one(&repository.pool)
        .await
        .expect("Failed to insert publisher")
}

async fn book(services: &Services, repository: &Repository, copies: i32) -> i32 {
    let pub_id = publisher(repository).await;
    let book = services
        .catalog
        .create_book(CreateBook {
            title: Some(unique("title")),
            isbn: Some(unique("isbn")[..20].to_string()),
            pub_id: Some(pub_id),
            cover_url: None,
            total_qty: Some(copies),
            category_ids: Vec::new(),
        })
        .await
        .expect("Failed to create book");
    book.book_id
}

async fn category(repository: &Repository, name: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(&repository.pool)
        .await
        .expect("Failed to insert category")
}

fn new_book(pub_id: i32, category_ids: Vec<i32>) -> CreateBook {
    CreateBook {
        title: Some(unique("title")),
        isbn: Some("9780441013593".to_string()),
        pub_id: Some(pub_id),
        cover_url: None,
        total_qty: Some(1),
        category_ids,
    }
}

async fn reader(services: &Services) -> Reader {
    services
        .readers
        .create(CreateReader {
            first_name: Some("Grace".into()),
            last_name: Some("Hopper".into()),
            email: Some(format!("{}@example.org", unique("grace"))),
            phone: None,
        })
        .await
        .expect("Failed to create reader")
}

#[tokio::test]
#[ignore]
async fn borrow_and_return_move_stock_by_one() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 2).await;
    let reader = reader(&services).await;

    let receipt = services.borrows.borrow(book_id, reader.id).await.unwrap();
    let stock = repository.books.stock(book_id).await.unwrap();
    assert_eq!((stock.current_qty, stock.total_qty), (1, 2));

    let record = services.borrows.get(receipt.record_id).await.unwrap();
    assert_eq!(record.status, BorrowStatus::Borrowed);
    assert!(record.due_date > record.borrow_date);

    let returned = services.borrows.return_book(receipt.record_id).await.unwrap();
    assert_eq!(returned.record.status, BorrowStatus::Returned);
    assert!(returned.fine.is_none());

    let stock = repository.books.stock(book_id).await.unwrap();
    assert_eq!((stock.current_qty, stock.total_qty), (2, 2));
    assert!(stock.is_consistent());
}

#[tokio::test]
#[ignore]
async fn out_of_stock_creates_no_record() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 0).await;
    let reader = reader(&services).await;

    let result = services.borrows.borrow(book_id, reader.id).await;
    assert!(matches!(result, Err(AppError::OutOfStock(_))));

    let history = services.readers.borrows(reader.id).await.unwrap();
    assert!(history.is_empty());
    assert_eq!(repository.books.stock(book_id).await.unwrap().current_qty, 0);
}

#[tokio::test]
#[ignore]
async fn unknown_book_or_reader_is_not_found() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 1).await;
    let reader = reader(&services).await;

    let result = services.borrows.borrow(i32::MAX, reader.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = services.borrows.borrow(book_id, i32::MAX).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(repository.books.stock(book_id).await.unwrap().current_qty, 1);
}

#[tokio::test]
#[ignore]
async fn concurrent_borrows_of_last_copy_have_one_winner() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 1).await;

    let mut readers = Vec::new();
    for _ in 0..8 {
        readers.push(reader(&services).await.id);
    }

    let mut tasks = JoinSet::new();
    for reader_id in readers {
        let services = services.clone();
        tasks.spawn(async move { services.borrows.borrow(book_id, reader_id).await });
    }

    let mut successes = 0;
    let mut out_of_stock = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::OutOfStock(_)) => out_of_stock += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(out_of_stock, 7);
    assert_eq!(repository.books.stock(book_id).await.unwrap().current_qty, 0);
    assert_eq!(repository.borrows.count_open_for_book(book_id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore]
async fn second_return_is_a_conflict() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 1).await;
    let reader = reader(&services).await;

    let receipt = services.borrows.borrow(book_id, reader.id).await.unwrap();
    services.borrows.return_book(receipt.record_id).await.unwrap();

    let again = services.borrows.return_book(receipt.record_id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert_eq!(repository.books.stock(book_id).await.unwrap().current_qty, 1);

    let unknown = services.borrows.return_book(i32::MAX).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn late_return_charges_a_fine_that_pays_once() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 1).await;
    let reader = reader(&services).await;

    let receipt = services.borrows.borrow(book_id, reader.id).await.unwrap();

    // Three and a half days late
    sqlx::query("UPDATE borrow_records SET due_date = $2 WHERE id = $1")
        .bind(receipt.record_id)
        .bind(Utc::now() - Duration::hours(84))
        .execute(&repository.pool)
        .await
        .unwrap();

    let overdue = services.borrows.get(receipt.record_id).await.unwrap();
    assert_eq!(overdue.status, BorrowStatus::Overdue);

    let returned = services.borrows.return_book(receipt.record_id).await.unwrap();
    assert_eq!(returned.fine, Some(Decimal::new(200, 2)));

    let fines = services.fines.for_reader(reader.id).await.unwrap();
    assert_eq!(fines.len(), 1);
    assert_eq!(fines[0].amount, Decimal::new(200, 2));
    assert_eq!(fines[0].reader_name, "Grace Hopper");
    assert!(!fines[0].paid_status);

    let first = services.fines.pay(fines[0].fine_id).await.unwrap();
    let second = services.fines.pay(fines[0].fine_id).await.unwrap();
    assert!(first.paid_status && second.paid_status);
    assert_eq!(first.paid_time, second.paid_time);

    let missing = services.fines.pay(i32::MAX).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn assessment_fines_open_overdue_borrows() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 1).await;
    let reader = reader(&services).await;

    let receipt = services.borrows.borrow(book_id, reader.id).await.unwrap();
    sqlx::query("UPDATE borrow_records SET due_date = $2 WHERE id = $1")
        .bind(receipt.record_id)
        .bind(Utc::now() - Duration::hours(30))
        .execute(&repository.pool)
        .await
        .unwrap();

    assert!(services.fines.assess_overdue().await.unwrap() >= 1);

    let fines = services.fines.for_reader(reader.id).await.unwrap();
    assert_eq!(fines.len(), 1);
    assert_eq!(fines[0].amount, Decimal::new(100, 2));
}

#[tokio::test]
#[ignore]
async fn duplicate_email_is_rejected_without_insert() {
    let (services, _) = setup().await;
    let first = reader(&services).await;

    let before = services
        .readers
        .list(&Default::default())
        .await
        .unwrap()
        .pagination
        .total;

    let duplicate = services
        .readers
        .create(CreateReader {
            first_name: Some("Other".into()),
            last_name: Some("Person".into()),
            email: Some(first.email.to_uppercase()),
            phone: None,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Validation(_))));

    let after = services
        .readers
        .list(&Default::default())
        .await
        .unwrap()
        .pagination
        .total;
    assert_eq!(before, after);
}

#[tokio::test]
#[ignore]
async fn reader_with_open_borrow_cannot_be_deleted() {
    let (services, repository) = setup().await;
    let book_id = book(&services, &repository, 1).await;
    let reader = reader(&services).await;

    let receipt = services.borrows.borrow(book_id, reader.id).await.unwrap();
    let blocked = services.readers.delete(reader.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    services.borrows.return_book(receipt.record_id).await.unwrap();
    services.readers.delete(reader.id).await.unwrap();

    let gone = services.readers.get_by_id(reader.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn login_token_resolves_to_the_admin() {
    let (services, repository) = setup().await;
    let username = unique("admin");
    let hash = hash_password("s3cret-pass").unwrap();
    let admin = repository.admins.create(&username, &hash).await.unwrap();

    let wrong = services.auth.authenticate(&username, "nope").await;
    assert!(matches!(wrong, Err(AppError::Authentication(_))));

    let (token, logged_in) = services.auth.authenticate(&username, "s3cret-pass").await.unwrap();
    assert_eq!(logged_in.id, admin.id);

    let secret = AppConfig::default().auth.jwt_secret;
    let claims = libris_server::models::admin::AdminClaims::verify(&token, &secret).unwrap();
    assert_eq!(claims.admin_id, admin.id);

    let current = services.auth.current_admin(&claims).await.unwrap();
    assert!(current.last_login.is_some());
}

#[tokio::test]
#[ignore]
async fn categories_are_joined_alphabetically() {
    let (services, repository) = setup().await;
    let pub_id = publisher(&repository).await;
    let zeta = format!("Zeta {}", unique("cat"));
    let alpha = format!("Alpha {}", unique("cat"));
    let zeta_id = category(&repository, &zeta).await;
    let alpha_id = category(&repository, &alpha).await;

    let tagged = services
        .catalog
        .create_book(new_book(pub_id, vec![zeta_id, alpha_id]))
        .await
        .unwrap();
    assert_eq!(tagged.categories, Some(format!("{}, {}", alpha, zeta)));

    let plain = services
        .catalog
        .create_book(new_book(pub_id, Vec::new()))
        .await
        .unwrap();
    assert_eq!(plain.categories, None);

    let books = services.catalog.list_books().await.unwrap();
    let listed = books.iter().find(|b| b.book_id == tagged.book_id).unwrap();
    assert_eq!(listed.categories, tagged.categories);
    assert_eq!((listed.current_qty, listed.total_qty), (1, 1));
    let listed = books.iter().find(|b| b.book_id == plain.book_id).unwrap();
    assert!(listed.categories.is_none());
}

#[tokio::test]
#[ignore]
async fn unknown_publisher_or_category_is_a_validation_error() {
    let (services, repository) = setup().await;

    let result = services.catalog.create_book(new_book(i32::MAX, Vec::new())).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let pub_id = publisher(&repository).await;
    let known = category(&repository, &unique("cat")).await;
    let result = services
        .catalog
        .create_book(new_book(pub_id, vec![known, i32::MAX]))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // Nothing of the rejected book was kept
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_categories WHERE cat_id = $1")
        .bind(known)
        .fetch_one(&repository.pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
#[ignore]
async fn reader_update_checks_existence_and_email() {
    let (services, _) = setup().await;
    let first = reader(&services).await;
    let second = reader(&services).await;

    let missing = services
        .readers
        .update(i32::MAX, UpdateReader {
            phone: Some("555-0100".into()),
            ..Default::default()
        })
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let taken = services
        .readers
        .update(second.id, UpdateReader {
            email: Some(first.email.to_uppercase()),
            ..Default::default()
        })
        .await;
    assert!(matches!(taken, Err(AppError::Validation(_))));

    // Keeping its own address is not a conflict
    let updated = services
        .readers
        .update(second.id, UpdateReader {
            email: Some(second.email.clone()),
            last_name: Some("Brewster".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.last_name, "Brewster");
    assert_eq!(updated.first_name, second.first_name);
    assert_eq!(updated.email, second.email);
}

#[tokio::test]
#[ignore]
async fn reader_pages_are_newest_first_slices() {
    let (services, _) = setup().await;
    for _ in 0..3 {
        reader(&services).await;
    }

    let first = services
        .readers
        .list(&ReaderQuery { page: Some(1), limit: Some(2) })
        .await
        .unwrap();
    assert_eq!(first.data.len(), 2);
    assert_eq!((first.pagination.page, first.pagination.limit), (1, 2));
    assert!(first.pagination.total >= 3);
    assert!(first.data[0].id > first.data[1].id);

    let second = services
        .readers
        .list(&ReaderQuery { page: Some(2), limit: Some(2) })
        .await
        .unwrap();
    assert!(!second.data.is_empty());
    assert!(second.data.iter().all(|r| r.id <= first.data[1].id));

    let beyond = services
        .readers
        .list(&ReaderQuery { page: Some(i64::from(i32::MAX)), limit: Some(100) })
        .await
        .unwrap();
    assert!(beyond.data.is_empty());

    let clamped = services
        .readers
        .list(&ReaderQuery { page: None, limit: Some(10_000) })
        .await
        .unwrap();
    assert_eq!(clamped.pagination.limit, 100);
}
