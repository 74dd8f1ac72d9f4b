//! Infrastructure layer: persistence adapters for book records.

pub mod book_store;

pub use book_store::{BookStore, InMemoryBookStore, PostgresBookStore, StoreError};
