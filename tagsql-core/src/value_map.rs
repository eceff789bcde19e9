use crate::Fields;
use serde_json::{Map, Value as JsonValue};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

/// Member name to JSON value, for the members selected by a tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap(pub BTreeMap<String, JsonValue>);

impl ValueMap {
    /// If some field negates `tag_key` every other field is kept, else if some
    /// field has it true only those are kept, else all fields are kept.
    pub fn from_fields(fields: &Fields, tag_key: &str) -> Self {
        let selected = if fields.iter().any(|f| f.has_tag_false([tag_key])) {
            fields.filtered_by(|f| !f.has_tag_false([tag_key]))
        } else if fields.iter().any(|f| f.has_tag_true([tag_key])) {
            fields.with_tag_true(&[tag_key])
        } else {
            fields.clone()
        };
        Self::collect(&selected)
    }

    /// Same selection over explicit tag values: fields holding `exclude` are
    /// dropped, else fields holding `include` are the only ones kept.
    pub fn with_values(fields: &Fields, tag_key: &str, exclude: &str, include: &str) -> Self {
        let selected = if fields.iter().any(|f| f.has_tag_value(tag_key, exclude)) {
            fields.without_tag_value(tag_key, exclude)
        } else if fields.iter().any(|f| f.has_tag_value(tag_key, include)) {
            fields.with_tag_value(tag_key, include)
        } else {
            fields.clone()
        };
        Self::collect(&selected)
    }

    fn collect(fields: &Fields) -> Self {
        Self(
            fields
                .iter()
                .map(|f| (f.name().to_string(), f.value().to_json()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<_, _>>(),
        )
    }

    /// Lowercase hex SHA-1 of the compact JSON, keys sorted.
    pub fn hash(&self) -> String {
        hex::encode(Sha1::digest(self.to_json().to_string().as_bytes()))
    }
}
