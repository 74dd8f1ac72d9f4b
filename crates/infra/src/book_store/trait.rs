use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use bookshelf_catalog::{Book, BookDraft};
use bookshelf_core::BookId;

/// Store operation error.
///
/// These are **infrastructure errors** (missing rows, violated column
/// constraints, backend failures) as opposed to the purely local wire
/// validation that runs before any store call.
///
/// ## Error Categories
///
/// - **NotFound**: no row exists for the requested id
/// - **Constraint**: a write violated the table contract (NOT NULL, the
///   title length bound, primary key uniqueness)
/// - **Database**: the backend itself failed (connection, pool, undecodable
///   row)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book not found")]
    NotFound,

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("store failure: {0}")]
    Database(String),
}

/// Durable, single-table book store.
///
/// The `BookStore` is the **persistence layer** for book records. One row
/// per book; the store assigns ids on insert and they are immutable
/// afterwards.
///
/// ## Design Principles
///
/// - **No storage assumptions**: works with the in-memory implementation
///   (tests/dev) and the Postgres backend (production)
/// - **Whole-row writes**: `update` replaces both mutable fields; there is
///   no partial-field patch operation
/// - **Single-row atomicity**: each operation touches exactly one row and
///   relies on the backend's per-statement guarantees; the store performs
///   no cross-row coordination
///
/// ## Semantics
///
/// - `insert` assigns the next id and returns the full record. Writes that
///   violate a column constraint fail with `Constraint`.
/// - `get` / `update` / `delete` fail with `NotFound` when no row has the
///   requested id; `delete` reports `NotFound` rather than succeeding
///   silently, so deleting the same id twice fails the second time.
/// - `list` returns all rows in store-defined order; no ordering is
///   guaranteed.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new row, assigning a fresh id.
    async fn insert(&self, draft: BookDraft) -> Result<Book, StoreError>;

    /// Fetch a single row by id.
    async fn get(&self, id: BookId) -> Result<Book, StoreError>;

    /// Fetch every row.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// Replace both mutable fields of an existing row.
    async fn update(&self, id: BookId, draft: BookDraft) -> Result<Book, StoreError>;

    /// Remove a row.
    async fn delete(&self, id: BookId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> BookStore for Arc<S>
where
    S: BookStore + ?Sized,
{
    async fn insert(&self, draft: BookDraft) -> Result<Book, StoreError> {
        (**self).insert(draft).await
    }

    async fn get(&self, id: BookId) -> Result<Book, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        (**self).list().await
    }

    async fn update(&self, id: BookId, draft: BookDraft) -> Result<Book, StoreError> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}
