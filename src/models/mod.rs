//! Data models for Libris

pub mod admin;
pub mod book;
pub mod borrow;
pub mod fine;
pub mod reader;

// Re-export commonly used types
pub use admin::{Admin, AdminClaims};
pub use book::{BookSummary, Category, Publisher};
pub use borrow::{BorrowRecord, BorrowStatus};
pub use fine::FineDetails;
pub use reader::Reader;

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string with surrounding whitespace removed, so
/// length rules see what will be stored.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()))
}
