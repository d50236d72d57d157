use axum::http::StatusCode;

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "Not Found")
}
