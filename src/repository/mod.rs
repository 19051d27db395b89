//! Repository layer: the `BookStore` abstraction and its implementations

pub mod books;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookPatch},
};

/// Persistence contract for book records.
///
/// Every method is a single round trip to the backing store. Absence is
/// reported through `Option`/`bool`; only backing-store failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Make sure the underlying table exists. Idempotent and memoized.
    async fn provision(&self) -> AppResult<()>;

    /// Connectivity probe
    async fn ping(&self) -> AppResult<()>;

    /// All books, most recently created first. Books sharing a creation
    /// time come back in reverse insertion order.
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Persist a fully built record and return it as stored
    async fn insert(&self, book: &Book) -> AppResult<Book>;

    /// Merge `patch` into the stored record and set `updated_at` to `now`
    async fn update(
        &self,
        id: Uuid,
        patch: &BookPatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Book>>;

    /// Returns true when a record was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Main repository struct holding the configured store
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Repository backed by Postgres
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self::with_store(Arc::new(books::PgBookStore::new(pool)))
    }

    /// Repository backed by an in-process store
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(memory::MemoryBookStore::new()))
    }

    pub fn with_store(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }
}
