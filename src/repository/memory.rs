//! In-process book store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch},
};

/// Books kept in insertion order behind a lock. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn provision(&self) -> AppResult<()> {
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        // Newest insertion first, then a stable sort keeps it as the tie-breaker
        let mut rows: Vec<Book> = books.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        if books.iter().any(|b| b.id == book.id) {
            return Err(AppError::Internal(format!("Duplicate book id {}", book.id)));
        }
        books.push(book.clone());
        Ok(book.clone())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &BookPatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Book>> {
        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|b| b.id == id).map(|book| {
            book.apply(patch, now);
            book.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok(books.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::{self, NewBook};
    use chrono::Duration;

    fn book_at(title: &str, created_at: DateTime<Utc>) -> Book {
        Book::new(
            NewBook {
                title: title.into(),
                author: "Anon".into(),
                publication_year: 2000,
                publishing_house: "House".into(),
            },
            created_at,
        )
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_with_insertion_tie_break() {
        let store = MemoryBookStore::new();
        let t0 = book::now();
        store.insert(&book_at("old", t0 - Duration::days(1))).await.unwrap();
        store.insert(&book_at("a", t0)).await.unwrap();
        store.insert(&book_at("b", t0)).await.unwrap();

        let titles: Vec<String> = store.list().await.unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["b", "a", "old"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = MemoryBookStore::new();
        let book = book_at("dup", book::now());
        store.insert(&book).await.unwrap();
        assert!(matches!(store.insert(&book).await, Err(AppError::Internal(_))));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let store = MemoryBookStore::new();
        let patch = BookPatch {
            title: Some("x".into()),
            ..Default::default()
        };
        assert!(store.update(Uuid::new_v4(), &patch, book::now()).await.unwrap().is_none());
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
