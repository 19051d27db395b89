//! Catalog service: book CRUD on top of the configured `BookStore`

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{self, Book, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Ensure the backing schema exists. Run once at startup.
    pub async fn provision(&self) -> AppResult<()> {
        self.repository.books.provision().await
    }

    /// Check that the backing store answers
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }

    /// List all books, most recent first
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get a book by id. Ids that are not UUIDs cannot exist.
    pub async fn get(&self, id: &str) -> AppResult<Option<Book>> {
        match parse_id(id) {
            Some(id) => self.repository.books.get(id).await,
            None => Ok(None),
        }
    }

    /// Validate and store a new book
    pub async fn create(&self, data: CreateBook) -> AppResult<Book> {
        let new_book = data.into_new_book()?;
        let book = self
            .repository
            .books
            .insert(&Book::new(new_book, book::now()))
            .await?;
        tracing::info!(id = %book.id, title = %book.title, "Book created");
        Ok(book)
    }

    /// Merge the supplied fields into an existing book.
    ///
    /// An update with no fields returns the stored record as is: no write
    /// happens and `updated_at` is left alone.
    pub async fn update(&self, id: &str, data: UpdateBook) -> AppResult<Option<Book>> {
        let patch = data.into_patch()?;
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        if patch.is_empty() {
            tracing::debug!(%id, "Empty book update, returning current record");
            return self.repository.books.get(id).await;
        }

        let updated = self.repository.books.update(id, &patch, book::now()).await?;
        if updated.is_some() {
            tracing::info!(%id, "Book updated");
        }
        Ok(updated)
    }

    /// Hard-delete a book. Returns false when nothing matched.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let deleted = self.repository.books.delete(id).await?;
        if deleted {
            tracing::info!(%id, "Book deleted");
        }
        Ok(deleted)
    }

    /// Insert the sample books if the catalog is empty. Returns how many were added.
    pub async fn seed_demo_books(&self) -> AppResult<usize> {
        if !self.repository.books.list().await?.is_empty() {
            return Ok(0);
        }
        let samples = book::demo_books();
        let count = samples.len();
        for sample in samples {
            self.repository
                .books
                .insert(&Book::new(sample, book::now()))
                .await?;
        }
        tracing::info!("Seeded {} demo books", count);
        Ok(count)
    }
}

fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id.trim()).ok()
}
