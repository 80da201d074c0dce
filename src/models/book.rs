//! Book model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Number of books returned per page by the list endpoint
pub const PAGE_SIZE: i64 = 5;

/// Book record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier
    pub id: i32,
    pub title: String,
    pub author: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 39.99)]
    pub price: Decimal,
    pub published_date: Option<DateTime<Utc>>,
}

/// Book request body for create and update.
///
/// Missing text fields deserialize as empty strings so that they are reported
/// by validation instead of failing JSON extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Ignored on create; must match the path id on update
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "Title is required"),
        length(max = 100, message = "Title must be at most 100 characters")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "Author is required"),
        length(max = 100, message = "Author must be at most 100 characters")
    )]
    pub author: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 39.99)]
    #[validate(required(message = "Price is required"), custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
}

/// Rejects empty and whitespace-only text
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Price must lie in (0.1, 10000]
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let min = Decimal::new(1, 1);
    let max = Decimal::new(10_000, 0);
    if *price > min && *price <= max {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("Price must be greater than 0.1 and at most 10000".into());
        Err(err)
    }
}

impl BookPayload {
    /// Build the stored representation under the given id.
    /// Call only on a payload that passed validation.
    pub fn into_book(self, id: i32) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            price: self.price.unwrap_or_default(),
            published_date: self.published_date,
        }
    }
}

/// List query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Exact, case-sensitive author match
    pub author: Option<String>,
    /// Page number, starting at 1
    pub page: Option<i64>,
}

/// Candidate set selector shared by the count and the page scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub author: Option<String>,
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        // an empty author means no filter
        Self {
            author: query.author.clone().filter(|a| !a.is_empty()),
        }
    }
}

/// One page of the (optionally filtered) catalog
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub total_books: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub books: Vec<Book>,
}

/// ceil(total_books / PAGE_SIZE)
pub fn total_pages(total_books: i64) -> i64 {
    (total_books + PAGE_SIZE - 1) / PAGE_SIZE
}

/// Row offset of the first book on `page` (1-based)
pub fn page_offset(page: i64) -> i64 {
    (page - 1) * PAGE_SIZE
}
