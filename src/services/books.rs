//! Book catalog service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{page_offset, total_pages, Book, BookFilter, BookPage, BookPayload, BookQuery, PAGE_SIZE},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// List books, optionally filtered by exact author, five per page.
    ///
    /// An empty candidate set always yields an empty page, whatever page was
    /// asked for; otherwise a page past the last one is rejected.
    pub async fn list(&self, query: &BookQuery) -> AppResult<BookPage> {
        let page = query.page.unwrap_or(1);
        let filter = BookFilter::from(query);

        let total_books = self.store.count(&filter).await?;
        let total_pages = total_pages(total_books);

        if page < 1 || (page > total_pages && total_pages > 0) {
            return Err(AppError::PageOutOfRange { page, total_pages });
        }

        let books = if total_books == 0 {
            Vec::new()
        } else {
            self.store.scan(&filter, page_offset(page), PAGE_SIZE).await?
        };

        tracing::debug!(
            author = ?filter.author,
            page,
            total_books,
            returned = books.len(),
            "listed books"
        );

        Ok(BookPage {
            total_books,
            total_pages,
            current_page: page,
            books,
        })
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Validate and persist a new book; the store assigns the id
    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        payload.validate()?;

        let created = self.store.insert(&payload.into_book(0)).await?;
        tracing::info!(book_id = created.id, "book created");
        Ok(created)
    }

    /// Replace every field of an existing book.
    ///
    /// The body id must match the path id. When the store reports that the
    /// write did not land, a vanished row becomes `NotFound` and anything else
    /// is escalated as an internal error.
    pub async fn update(&self, id: i32, payload: BookPayload) -> AppResult<()> {
        if payload.id != id {
            return Err(AppError::IdMismatch {
                path_id: id,
                body_id: payload.id,
            });
        }
        payload.validate()?;

        match self.store.update(&payload.into_book(id)).await {
            Ok(()) => {
                tracing::info!(book_id = id, "book updated");
                Ok(())
            }
            Err(AppError::Conflict(reason)) => {
                if !self.store.exists(id).await? {
                    return Err(AppError::NotFound(format!("Book {} not found", id)));
                }
                Err(AppError::Internal(format!(
                    "Unresolved write conflict on book {}: {}",
                    id, reason
                )))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
