//! Style payloads carried by overlays
//!
//! Text and paragraph styles are open-ended JSON objects on the wire
//! (`{"bl": 1, "fs": 14}`), so they are kept as ordered maps instead of
//! a closed struct. Merging follows key-level override semantics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Ordered attribute map (text style, paragraph style)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

/// Character style of a text run (`ts`)
pub type TextStyle = Attributes;

/// Paragraph-level style (`paragraphStyle`)
pub type ParagraphStyle = Attributes;

impl Attributes {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style setter, mostly for fixtures
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return a copy of `self` with every key of `other` written over it
    pub fn merged(&self, other: &Attributes) -> Attributes {
        let mut map = self.0.clone();
        for (key, value) in &other.0 {
            map.insert(key.clone(), value.clone());
        }
        Attributes(map)
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// List membership of a paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    pub list_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub list_type: String,
    #[serde(default)]
    pub nesting_level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

impl Bullet {
    pub fn new(list_id: &str, list_type: &str) -> Self {
        Self {
            list_id: list_id.to_string(),
            list_type: list_type.to_string(),
            nesting_level: 0,
            text_style: None,
        }
    }
}

/// Kind of a custom range, numeric on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum CustomRangeType {
    Hyperlink = 0,
    Field = 1,
    Sheet = 2,
    Comment = 3,
    Custom = 4,
    Mention = 5,
    UniFormula = 6,
    Delimiter = 7,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merged_overrides_keys() {
        let base = Attributes::new().with("bl", 1).with("fs", 12);
        let update = Attributes::new().with("fs", 14).with("it", 1);

        let merged = base.merged(&update);
        assert_eq!(merged.get("bl"), Some(&json!(1)));
        assert_eq!(merged.get("fs"), Some(&json!(14)));
        assert_eq!(merged.get("it"), Some(&json!(1)));
    }

    #[test]
    fn test_attributes_serialize_as_plain_object() {
        let ts = Attributes::new().with("bl", 1);
        assert_eq!(serde_json::to_value(&ts).unwrap(), json!({"bl": 1}));
    }

    #[test]
    fn test_custom_range_type_is_numeric() {
        assert_eq!(serde_json::to_value(CustomRangeType::Comment).unwrap(), json!(3));
        let parsed: CustomRangeType = serde_json::from_value(json!(0)).unwrap();
        assert_eq!(parsed, CustomRangeType::Hyperlink);
    }
}
