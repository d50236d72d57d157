use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use songparts_core::{DomainError, PartId};
use songparts_infra::StoreError;

/// Request failure, mapped to a fixed status code and message.
///
/// Store failures never leak their detail to the caller; they are logged at
/// the point of failure and answered with a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("missing part id")]
    MissingId,

    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("part not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingId | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::MissingId => "missing_id",
            ApiError::InvalidBody(_) => "invalid_body",
            ApiError::PayloadTooLarge => "payload_too_large",
            ApiError::NotFound => "not_found",
            ApiError::Store(_) => "internal_error",
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "Method Not Allowed",
            ApiError::MissingId => "Bad Request - Missing part ID",
            ApiError::InvalidBody(_) => "Bad Request - Body must be a JSON object",
            ApiError::PayloadTooLarge => "Payload Too Large",
            ApiError::NotFound => "Not Found - Part not found",
            ApiError::Store(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        json_error(self.status(), self.code(), self.public_message())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound,
            other => ApiError::Store(other),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::InvalidBody(msg),
            DomainError::InvalidId(_) => ApiError::MissingId,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::InvalidBody(rejection.body_text())
        }
    }
}

/// Convert a store error into an [`ApiError`], logging anything that is not a
/// plain not-found.
pub fn store_failure<'a>(
    operation: &'static str,
    part_id: Option<&'a PartId>,
) -> impl FnOnce(StoreError) -> ApiError + 'a {
    move |err| {
        if !matches!(err, StoreError::NotFound { .. }) {
            tracing::error!(
                operation,
                part_id = part_id.map(PartId::as_str),
                error = %err,
                "store operation failed"
            );
        }
        ApiError::from(err)
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
