use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use bookshelf_catalog::{Book, BookDraft, TITLE_MAX_CHARS};
use bookshelf_core::BookId;

use super::r#trait::{BookStore, StoreError};

#[derive(Debug, Default)]
struct Shelf {
    rows: BTreeMap<BookId, Book>,
    last_id: i64,
}

/// In-memory book store.
///
/// Intended for tests/dev. Enforces the same column constraints as the
/// relational table so behavior matches the Postgres store.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: RwLock<Shelf>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_columns(draft: &BookDraft) -> Result<(), StoreError> {
        if draft.title.chars().count() > TITLE_MAX_CHARS {
            return Err(StoreError::Constraint(format!(
                "title exceeds {TITLE_MAX_CHARS} characters"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn insert(&self, draft: BookDraft) -> Result<Book, StoreError> {
        Self::check_columns(&draft)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))?;

        // Ids are never reused, even after deletes.
        inner.last_id += 1;
        let id = BookId::from_i64(inner.last_id);
        let book = draft.into_book(id);
        inner.rows.insert(id, book.clone());
        Ok(book)
    }

    async fn get(&self, id: BookId) -> Result<Book, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))?;

        inner.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))?;

        Ok(inner.rows.values().cloned().collect())
    }

    async fn update(&self, id: BookId, draft: BookDraft) -> Result<Book, StoreError> {
        Self::check_columns(&draft)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))?;

        match inner.rows.get_mut(&id) {
            Some(row) => {
                *row = draft.into_book(id);
                Ok(row.clone())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))?;

        inner.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
