//! Book (catalog) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::trimmed;

/// Catalog entry joined with its publisher name and categories
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    #[serde(rename = "BookID")]
    pub book_id: i32,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "CoverURL")]
    pub cover_url: String,
    #[serde(rename = "Publisher")]
    pub publisher: String,
    /// Category names joined with ", " in alphabetical order, null when uncategorized
    #[serde(rename = "Categories")]
    pub categories: Option<String>,
    #[serde(rename = "CurrentQty")]
    pub current_qty: i32,
    #[serde(rename = "TotalQty")]
    pub total_qty: i32,
}

/// Stock counters of one book
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Stock {
    pub current_qty: i32,
    pub total_qty: i32,
}

impl Stock {
    pub fn is_consistent(&self) -> bool {
        0 <= self.current_qty && self.current_qty <= self.total_qty
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Publisher {
    #[serde(rename = "PubID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    #[serde(rename = "CatID")]
    pub id: i32,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[serde(rename = "Title", default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 500, message = "Title must be 1 to 500 characters")
    )]
    pub title: Option<String>,
    #[serde(rename = "ISBN", default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "ISBN is required"),
        length(min = 1, max = 20, message = "ISBN must be 1 to 20 characters")
    )]
    pub isbn: Option<String>,
    #[serde(rename = "PubID")]
    #[validate(required(message = "PubID is required"))]
    pub pub_id: Option<i32>,
    #[serde(rename = "CoverURL", default, deserialize_with = "trimmed")]
    pub cover_url: Option<String>,
    /// Number of physical copies, defaults to 1
    #[serde(rename = "TotalQty")]
    #[validate(range(min = 0, message = "TotalQty cannot be negative"))]
    pub total_qty: Option<i32>,
    #[serde(rename = "CategoryIDs", default)]
    pub category_ids: Vec<i32>,
}

/// Book insert with every field resolved
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub pub_id: i32,
    pub cover_url: String,
    pub total_qty: i32,
    pub category_ids: Vec<i32>,
}

impl CreateBook {
    /// Resolve defaults. Call after `validate()`.
    pub fn into_new_book(self) -> NewBook {
        let mut category_ids = self.category_ids;
        category_ids.sort_unstable();
        category_ids.dedup();

        NewBook {
            title: self.title.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
            pub_id: self.pub_id.unwrap_or_default(),
            cover_url: self.cover_url.unwrap_or_default(),
            total_qty: self.total_qty.unwrap_or(1),
            category_ids,
        }
    }
}
