//! Repository layer for database operations

pub mod books;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::book::{Book, BookFilter},
};

pub use books::BooksRepository;

/// Storage primitives the catalog service is built on.
///
/// Each call is independent: implementations acquire whatever connection they
/// need for the duration of the call and release it before returning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new book. The `id` of the argument is ignored; the returned
    /// record carries the id assigned by the store.
    async fn insert(&self, book: &Book) -> AppResult<Book>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    async fn exists(&self, id: i32) -> AppResult<bool>;

    /// Replace every field of the row identified by `book.id`.
    /// Returns `AppError::Conflict` when no row was written.
    async fn update(&self, book: &Book) -> AppResult<()>;

    /// Remove a row. Returns false when there was nothing to remove.
    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn count(&self, filter: &BookFilter) -> AppResult<i64>;

    /// Candidate set in ascending id order, windowed by offset and limit
    async fn scan(&self, filter: &BookFilter, offset: i64, limit: i64) -> AppResult<Vec<Book>>;

    /// Round-trip to the backing store, used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}
