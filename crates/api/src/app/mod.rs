//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the shared store handle and part operations
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Largest accepted request body (10 MiB). Larger bodies get a JSON 413.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `services` is constructed once per process and shared by every request.
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(ServiceBuilder::new().layer(middleware::trace_layer()))
}
