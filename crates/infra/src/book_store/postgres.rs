//! Postgres-backed book store implementation.
//!
//! Persists book rows in a single `books` table (see `schema.sql`). Id
//! assignment is delegated to the table's `BIGSERIAL` sequence, and each
//! operation is one statement, so atomicity comes from the database's
//! per-statement guarantees.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | PostgreSQL Error Code | StoreError | Scenario |
//! |-----------------------|------------|----------|
//! | `23502` (not-null) | `Constraint` | A required column was written as NULL |
//! | `23505` (unique) | `Constraint` | Duplicate primary key (should not occur; ids come from the sequence) |
//! | `23514` (check) | `Constraint` | Check constraint violation |
//! | `22001` (string truncation) | `Constraint` | `title` longer than the `VARCHAR(200)` bound |
//! | other | `Database` | Connection, pool, or unexpected backend failures |
//!
//! ## Thread Safety
//!
//! `PostgresBookStore` is `Send + Sync`; all operations go through the SQLx
//! connection pool, which handles thread-safe connection management.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use bookshelf_catalog::{Book, BookDraft};
use bookshelf_core::BookId;

use super::r#trait::{BookStore, StoreError};

const SCHEMA: &str = include_str!("schema.sql");

/// Postgres-backed book store.
#[derive(Debug, Clone)]
pub struct PostgresBookStore {
    pool: Arc<PgPool>,
}

impl PostgresBookStore {
    /// Create a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `books` table if it does not exist yet.
    ///
    /// Idempotent; meant to run once at startup. There is no versioned
    /// migration layer behind this.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    #[instrument(skip(self, draft), err)]
    async fn insert_book(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO books (title, release_year)
            VALUES ($1, $2)
            RETURNING id, title, release_year
            "#,
        )
        .bind(&draft.title)
        .bind(draft.release_year)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_book", e))?;

        decode_book(&row)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn get_book(&self, id: BookId) -> Result<Book, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, release_year
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_book", e))?;

        match row {
            Some(row) => decode_book(&row),
            None => Err(StoreError::NotFound),
        }
    }

    #[instrument(skip(self), err)]
    async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, release_year
            FROM books
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_books", e))?;

        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            books.push(decode_book(&row)?);
        }
        Ok(books)
    }

    #[instrument(skip(self, draft), fields(id = %id), err)]
    async fn update_book(&self, id: BookId, draft: BookDraft) -> Result<Book, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, release_year = $2
            WHERE id = $3
            RETURNING id, title, release_year
            "#,
        )
        .bind(&draft.title)
        .bind(draft.release_year)
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_book", e))?;

        match row {
            Some(row) => decode_book(&row),
            None => Err(StoreError::NotFound),
        }
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete_book(&self, id: BookId) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_book", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for PostgresBookStore {
    async fn insert(&self, draft: BookDraft) -> Result<Book, StoreError> {
        self.insert_book(draft).await
    }

    async fn get(&self, id: BookId) -> Result<Book, StoreError> {
        self.get_book(id).await
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        self.list_books().await
    }

    async fn update(&self, id: BookId, draft: BookDraft) -> Result<Book, StoreError> {
        self.update_book(id, draft).await
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        self.delete_book(id).await
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                // Constraint class: the write violated the table contract.
                Some("23502") | Some("23505") | Some("23514") => StoreError::Constraint(msg),
                // Value too long for VARCHAR(200).
                Some("22001") => StoreError::Constraint(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::Database(format!("sqlx error in {operation}: {err}")),
    }
}

// SQLx row type

#[derive(Debug)]
struct BookRow {
    id: i64,
    title: String,
    release_year: i32,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for BookRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        Ok(BookRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            release_year: row.try_get("release_year")?,
        })
    }
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: BookId::from_i64(row.id),
            title: row.title,
            release_year: row.release_year,
        }
    }
}

fn decode_book(row: &sqlx::postgres::PgRow) -> Result<Book, StoreError> {
    let row = BookRow::from_row(row)
        .map_err(|e| StoreError::Database(format!("failed to decode book row: {e}")))?;
    Ok(row.into())
}
