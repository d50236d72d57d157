use serde::Serialize;

use songparts_core::{Part, PartId};

/// Raw query string pairs in request order. Repeated keys are all kept, so
/// `?id=a&id=b` still deserializes; the first `id` is the one used.
pub type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: String,
}

impl CreatedResponse {
    pub fn new(id: PartId) -> Self {
        Self {
            success: true,
            id: id.into_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

pub fn part_to_json(part: Part) -> serde_json::Value {
    part.to_json()
}

pub fn parts_to_json(parts: Vec<Part>) -> serde_json::Value {
    serde_json::Value::Array(parts.into_iter().map(part_to_json).collect())
}
