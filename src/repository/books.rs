//! Books repository backed by PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter},
};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id             SERIAL PRIMARY KEY,
        title          VARCHAR(100) NOT NULL,
        author         VARCHAR(100) NOT NULL,
        price          NUMERIC NOT NULL,
        published_date TIMESTAMPTZ
    )
"#;

// SQLSTATE codes Postgres raises when a concurrent transaction wins
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create the `books` table if it does not exist yet
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

fn is_write_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
        ),
        _ => false,
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, price, published_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, author, price, published_date
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price)
        .bind(book.published_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, price, published_date FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author = $2, price = $3, published_date = $4
            WHERE id = $5
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price)
        .bind(book.published_date)
        .bind(book.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_write_conflict(&e) {
                AppError::Conflict(format!("Concurrent modification of book {}: {}", book.id, e))
            } else {
                AppError::Database(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Update of book {} affected no rows",
                book.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, filter: &BookFilter) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE ($1::text IS NULL OR author = $1)",
        )
        .bind(filter.author.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn scan(&self, filter: &BookFilter, offset: i64, limit: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, price, published_date
            FROM books
            WHERE ($1::text IS NULL OR author = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.author.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
