use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Extension, Query},
    http::{HeaderMap, Method},
    Json,
};

use crate::app::dto::{self, CreatedResponse, QueryPairs, SuccessResponse};
use crate::app::errors::{store_failure, ApiError};
use crate::app::routes::common::{parse_fields, require_id, require_json_method, require_method};
use crate::app::services::AppServices;

pub async fn create_part(
    Extension(services): Extension<Arc<AppServices>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    require_json_method(&method, Method::POST, &headers)?;
    let fields = parse_fields(&body?)?;

    let id = services
        .create_part(fields)
        .await
        .map_err(store_failure("create_part", None))?;

    tracing::info!(part_id = %id, "part created");
    Ok(Json(CreatedResponse::new(id)))
}

pub async fn list_parts(
    Extension(services): Extension<Arc<AppServices>>,
    method: Method,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_method(&method, Method::GET)?;

    let parts = services
        .list_parts()
        .await
        .map_err(store_failure("list_parts", None))?;

    tracing::debug!(count = parts.len(), "listed parts");
    Ok(Json(dto::parts_to_json(parts)))
}

pub async fn get_part(
    Extension(services): Extension<Arc<AppServices>>,
    method: Method,
    query: Option<Query<QueryPairs>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_method(&method, Method::GET)?;
    let id = require_id(query)?;

    match services
        .get_part(&id)
        .await
        .map_err(store_failure("get_part", Some(&id)))?
    {
        Some(part) => Ok(Json(dto::part_to_json(part))),
        None => Err(ApiError::NotFound),
    }
}

pub async fn update_part(
    Extension(services): Extension<Arc<AppServices>>,
    method: Method,
    headers: HeaderMap,
    query: Option<Query<QueryPairs>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_json_method(&method, Method::PUT, &headers)?;
    let id = require_id(query)?;
    let patch = parse_fields(&body?)?;

    services
        .update_part(&id, patch)
        .await
        .map_err(store_failure("update_part", Some(&id)))?;

    tracing::info!(part_id = %id, "part updated");
    Ok(Json(SuccessResponse::ok()))
}

pub async fn delete_part(
    Extension(services): Extension<Arc<AppServices>>,
    method: Method,
    query: Option<Query<QueryPairs>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    require_method(&method, Method::DELETE)?;
    let id = require_id(query)?;

    services
        .delete_part(&id)
        .await
        .map_err(store_failure("delete_part", Some(&id)))?;

    tracing::info!(part_id = %id, "part deleted");
    Ok(Json(SuccessResponse::ok()))
}
