//! Postgres-backed book store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{migrate::Migrator, Pool, Postgres};
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch},
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
    provisioned: Arc<OnceCell<()>>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            provisioned: Arc::new(OnceCell::new()),
        }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn provision(&self) -> AppResult<()> {
        self.provisioned
            .get_or_try_init(|| async {
                MIGRATOR.run(&self.pool).await?;
                tracing::info!("Books schema provisioned");
                Ok::<_, AppError>(())
            })
            .await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, publication_year, publishing_house, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.publication_year)
        .bind(&book.publishing_house)
        .bind(book.created_at)
        .bind(book.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &BookPatch,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Book>> {
        // Absent fields bind as NULL and keep the stored value
        let row = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                publication_year = COALESCE($4, publication_year),
                publishing_house = COALESCE($5, publishing_house),
                updated_at = GREATEST($6, updated_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.author.as_deref())
        .bind(patch.publication_year)
        .bind(patch.publishing_house.as_deref())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
