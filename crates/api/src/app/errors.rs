use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use bookshelf_catalog::ValidationErrors;
use bookshelf_infra::StoreError;

/// Map a store failure onto the HTTP surface.
///
/// Missing rows surface as an empty-body 404. Everything else is a 500:
/// wire validation has already run by the time the store is called, so a
/// constraint violation here means the layers disagree.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => StatusCode::NOT_FOUND.into_response(),
        StoreError::Constraint(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "constraint_error", msg)
        }
        StoreError::Database(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

/// Render field-scoped validation failures as a 400 with the per-field map.
pub fn validation_errors_to_response(failures: ValidationErrors) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(failures)).into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
