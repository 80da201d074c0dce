//! Shared test helpers: an in-memory book store and a server spawner.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bookstore_server::{
    api,
    error::{AppError, AppResult},
    models::{Book, BookFilter},
    repository::BookStore,
    services::Services,
    AppState,
};
use serde_json::{json, Value};

/// `BookStore` kept in a BTreeMap so scans come back in ascending id order.
#[derive(Default)]
pub struct MemoryBookStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i32,
    books: BTreeMap<i32, Book>,
}

fn matches(filter: &BookFilter, book: &Book) -> bool {
    filter.author.as_deref().map_or(true, |a| book.author == a)
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let mut state = self.inner.lock().unwrap();
        state.next_id += 1;
        let mut stored = book.clone();
        stored.id = state.next_id;
        state.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.inner.lock().unwrap().books.get(&id).cloned())
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().books.contains_key(&id))
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let mut state = self.inner.lock().unwrap();
        match state.books.get_mut(&book.id) {
            Some(existing) => {
                *existing = book.clone();
                Ok(())
            }
            None => Err(AppError::Conflict(format!("Update of book {} affected no rows", book.id))),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().books.remove(&id).is_some())
    }

    async fn count(&self, filter: &BookFilter) -> AppResult<i64> {
        let state = self.inner.lock().unwrap();
        Ok(state.books.values().filter(|b| matches(filter, b)).count() as i64)
    }

    async fn scan(&self, filter: &BookFilter, offset: i64, limit: i64) -> AppResult<Vec<Book>> {
        let state = self.inner.lock().unwrap();
        Ok(state
            .books
            .values()
            .filter(|b| matches(filter, b))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// A store whose every call fails, for readiness checks
pub struct UnreachableStore;

#[async_trait]
impl BookStore for UnreachableStore {
    async fn insert(&self, _book: &Book) -> AppResult<Book> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: i32) -> AppResult<Option<Book>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn exists(&self, _id: i32) -> AppResult<bool> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _book: &Book) -> AppResult<()> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i32) -> AppResult<bool> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn count(&self, _filter: &BookFilter) -> AppResult<i64> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn scan(&self, _filter: &BookFilter, _offset: i64, _limit: i64) -> AppResult<Vec<Book>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
pub async fn spawn_server_with(store: Arc<dyn BookStore>) -> String {
    let app = api::create_router(AppState::new(Services::new(store)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

pub async fn spawn_server() -> String {
    spawn_server_with(Arc::new(MemoryBookStore::default())).await
}

pub fn book_json(title: &str, author: &str, price: f64) -> Value {
    json!({
        "title": title,
        "author": author,
        "price": price,
        "publishedDate": "2001-02-03T04:05:06Z"
    })
}

/// POST a book and return the created body
pub async fn create_book(client: &reqwest::Client, base: &str, body: &Value) -> Value {
    let resp = client
        .post(format!("{}/api/books", base))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}
