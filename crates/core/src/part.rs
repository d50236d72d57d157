//! Part document model.
//!
//! A part is one section of a larger piece (verse, chorus, bridge, ...). Its
//! payload is schema-free: any JSON object is accepted and stored as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{DomainError, DomainResult};
use crate::id::PartId;

/// Open-ended field mapping of a part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartFields(Map<String, JsonValue>);

impl PartFields {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Accept a JSON value as a payload. Only objects are valid.
    pub fn from_json(value: JsonValue) -> DomainResult<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(DomainError::validation(format!(
                "payload must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Shallow merge: top-level keys of `patch` replace existing values,
    /// keys absent from `patch` are left untouched.
    pub fn merge(&mut self, patch: PartFields) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, JsonValue> {
        self.0
    }
}

impl From<Map<String, JsonValue>> for PartFields {
    fn from(value: Map<String, JsonValue>) -> Self {
        Self(value)
    }
}

/// A stored part: store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: PartId,
    pub fields: PartFields,
}

impl Part {
    pub fn new(id: PartId, fields: PartFields) -> Self {
        Self { id, fields }
    }

    /// JSON representation: the fields plus `"id"`.
    ///
    /// The store-assigned id always wins over an `"id"` key inside the payload.
    pub fn to_json(&self) -> JsonValue {
        let mut map = self.fields.as_map().clone();
        map.insert("id".to_string(), JsonValue::String(self.id.to_string()));
        JsonValue::Object(map)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fields(value: JsonValue) -> PartFields {
        PartFields::from_json(value).unwrap()
    }

    #[test]
    fn only_objects_are_accepted_as_payload() {
        assert!(PartFields::from_json(json!({"title": "Intro"})).is_ok());

        for bad in [json!([1, 2]), json!("verse"), json!(3), json!(null), json!(true)] {
            match PartFields::from_json(bad) {
                Err(DomainError::Validation(msg)) => assert!(msg.contains("JSON object")),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn merge_is_shallow() {
        let mut base = fields(json!({
            "title": "Chorus",
            "meta": {"key": "G", "bpm": 120},
        }));
        base.merge(fields(json!({"meta": {"key": "A"}})));

        assert_eq!(base.get("title"), Some(&json!("Chorus")));
        // Nested objects are replaced, not merged.
        assert_eq!(base.get("meta"), Some(&json!({"key": "A"})));
    }

    #[test]
    fn merge_with_empty_patch_is_noop() {
        let mut base = fields(json!({"title": "Bridge"}));
        let before = base.clone();
        base.merge(PartFields::new());
        assert_eq!(base, before);
    }

    #[test]
    fn to_json_includes_id() {
        let id = PartId::parse("X").unwrap();
        let part = Part::new(id, fields(json!({"title": "Intro"})));
        assert_eq!(part.to_json(), json!({"id": "X", "title": "Intro"}));
    }

    #[test]
    fn store_id_wins_over_payload_id() {
        let id = PartId::parse("real").unwrap();
        let part = Part::new(id, fields(json!({"id": "spoofed", "order": 2})));
        assert_eq!(part.to_json(), json!({"id": "real", "order": 2}));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: keys not present in the patch keep their previous values.
        #[test]
        fn merge_preserves_untouched_keys(
            base in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12),
            patch in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12),
        ) {
            let mut merged: PartFields = base
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect::<Map<_, _>>()
                .into();
            merged.merge(
                patch
                    .iter()
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .collect::<Map<_, _>>()
                    .into(),
            );

            for (k, v) in &base {
                if !patch.contains_key(k) {
                    prop_assert_eq!(merged.get(k).cloned(), Some(json!(v)));
                }
            }
        }

        /// Property: every key in the patch ends up with the patch value.
        #[test]
        fn merge_applies_every_patch_key(
            base in prop::collection::btree_map("[a-z]{1,8}", "[a-z ]{0,16}", 0..12),
            patch in prop::collection::btree_map("[a-z]{1,8}", "[a-z ]{0,16}", 0..12),
        ) {
            let mut merged: PartFields = base
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect::<Map<_, _>>()
                .into();
            merged.merge(
                patch
                    .iter()
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .collect::<Map<_, _>>()
                    .into(),
            );

            for (k, v) in &patch {
                prop_assert_eq!(merged.get(k).cloned(), Some(json!(v)));
            }
            let expected_len = base.keys().chain(patch.keys()).collect::<std::collections::BTreeSet<_>>().len();
            prop_assert_eq!(merged.len(), expected_len);
        }
    }
}
