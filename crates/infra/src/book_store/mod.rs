//! Book persistence boundary.
//!
//! This module defines the storage-facing abstraction for book rows without
//! making any storage assumptions, plus the two implementations behind it:
//! in-memory (tests/dev) and Postgres (production).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryBookStore;
pub use postgres::PostgresBookStore;
pub use r#trait::{BookStore, StoreError};
