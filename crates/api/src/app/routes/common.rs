//! Request guards shared by the part endpoints.
//!
//! Checks run in a fixed order: method and content type (405), then the id
//! query parameter (400), then the body (400). Nothing touches the store until
//! all of them pass.

use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{header, HeaderMap, Method};

use songparts_core::{PartFields, PartId};

use crate::app::dto::QueryPairs;
use crate::app::errors::ApiError;

pub fn require_method(actual: &Method, expected: Method) -> Result<(), ApiError> {
    if *actual == expected {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

/// Method check plus a JSON content type. A wrong content type is answered
/// like a wrong method.
pub fn require_json_method(
    actual: &Method,
    expected: Method,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    require_method(actual, expected)?;
    if is_json_content_type(headers) {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

/// True when the media type essence is `application/json` (parameters such as
/// `charset` are ignored).
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// Extract the `id` query parameter. When `id` is repeated the first value
/// wins. Missing, empty, or unparsable query strings count as a missing id.
pub fn require_id(query: Option<Query<QueryPairs>>) -> Result<PartId, ApiError> {
    let raw = query
        .and_then(|Query(pairs)| pairs.into_iter().find(|(key, _)| key == "id"))
        .map(|(_, value)| value)
        .ok_or(ApiError::MissingId)?;
    Ok(PartId::parse(&raw)?)
}

/// Parse a request body as a JSON object. An empty body is an empty object.
pub fn parse_fields(body: &Bytes) -> Result<PartFields, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PartFields::new());
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    Ok(PartFields::from_json(value)?)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use serde_json::json;

    use super::*;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn json_content_type_ignores_parameters_and_case() {
        assert!(is_json_content_type(&headers_with("application/json")));
        assert!(is_json_content_type(&headers_with("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers_with("Application/JSON")));
        assert!(!is_json_content_type(&headers_with("text/plain")));
        assert!(!is_json_content_type(&headers_with("application/jsonl")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[test]
    fn method_is_checked_before_content_type() {
        let err = require_json_method(&Method::GET, Method::POST, &headers_with("application/json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::MethodNotAllowed));

        let err = require_json_method(&Method::POST, Method::POST, &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::MethodNotAllowed));

        assert!(require_json_method(&Method::PUT, Method::PUT, &headers_with("application/json")).is_ok());
    }

    fn pairs(items: &[(&str, &str)]) -> Option<Query<QueryPairs>> {
        Some(Query(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn id_must_be_present_and_non_empty() {
        assert!(matches!(require_id(None), Err(ApiError::MissingId)));
        assert!(matches!(require_id(pairs(&[])), Err(ApiError::MissingId)));
        assert!(matches!(
            require_id(pairs(&[("other", "1")])),
            Err(ApiError::MissingId)
        ));
        assert!(matches!(
            require_id(pairs(&[("id", "")])),
            Err(ApiError::MissingId)
        ));

        let id = require_id(pairs(&[("other", "1"), ("id", "abc")])).unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn repeated_id_uses_first_value() {
        let id = require_id(pairs(&[("id", "first"), ("id", "second")])).unwrap();
        assert_eq!(id.as_str(), "first");
    }

    #[test]
    fn body_must_be_a_json_object() {
        let fields = parse_fields(&Bytes::from_static(br#"{"title":"Intro"}"#)).unwrap();
        assert_eq!(fields.get("title"), Some(&json!("Intro")));

        assert!(parse_fields(&Bytes::new()).unwrap().is_empty());
        assert!(parse_fields(&Bytes::from_static(b"  \n")).unwrap().is_empty());

        assert!(matches!(
            parse_fields(&Bytes::from_static(b"[1,2]")),
            Err(ApiError::InvalidBody(_))
        ));
        assert!(matches!(
            parse_fields(&Bytes::from_static(b"{not json")),
            Err(ApiError::InvalidBody(_))
        ));
    }
}
