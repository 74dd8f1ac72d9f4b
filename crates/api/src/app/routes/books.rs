use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use bookshelf_catalog::BookDraft;
use bookshelf_core::BookId;
use bookshelf_infra::BookStore;

use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/create/", post(create_book))
        .route("/:id/", put(update_book).delete(delete_book))
}

pub async fn list_books(
    Extension(store): Extension<Arc<dyn BookStore>>,
) -> axum::response::Response {
    match store.list().await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_book(
    Extension(store): Extension<Arc<dyn BookStore>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let draft = match BookDraft::from_wire(&body) {
        Ok(d) => d,
        Err(failures) => return errors::validation_errors_to_response(failures),
    };

    match store.insert(draft).await {
        Ok(book) => (StatusCode::CREATED, Json(book)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_book(
    Extension(store): Extension<Arc<dyn BookStore>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    // A non-numeric id segment can never name a row.
    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    // Lookup first: an unknown id is 404 even when the body is invalid too.
    if let Err(e) = store.get(id).await {
        return errors::store_error_to_response(e);
    }

    let draft = match BookDraft::from_wire(&body) {
        Ok(d) => d,
        Err(failures) => return errors::validation_errors_to_response(failures),
    };

    match store.update(id, draft).await {
        Ok(book) => (StatusCode::OK, Json(book)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_book(
    Extension(store): Extension<Arc<dyn BookStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    match store.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
