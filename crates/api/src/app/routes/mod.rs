use axum::{routing::any, Router};

pub mod common;
pub mod parts;
pub mod system;

/// Router for the part endpoints.
///
/// Every route accepts all methods; each handler checks its own method so a
/// mismatch gets the same JSON 405 body everywhere.
pub fn router() -> Router {
    Router::new()
        .route("/createPart", any(parts::create_part))
        .route("/getParts", any(parts::list_parts))
        .route("/getPart", any(parts::get_part))
        .route("/updatePart", any(parts::update_part))
        .route("/deletePart", any(parts::delete_part))
}
