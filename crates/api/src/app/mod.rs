//! HTTP API application wiring (Axum router + store wiring).
//!
//! This folder is structured like:
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use bookshelf_infra::BookStore;

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(store: Arc<dyn BookStore>) -> Router {
    routes::router().layer(ServiceBuilder::new().layer(Extension(store)))
}
