//! Flat, application-facing attribute values.
//!
//! # Responsibility
//! - Define the tagged value shape exchanged at the record boundary.
//! - Provide a case-insensitive attribute map.
//!
//! # Invariants
//! - Keys are stored ASCII-lowercased; lookups normalize the same way.
//! - Map ordering carries no meaning (stored sorted for determinism).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value as seen by application code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Attribute declared but nothing found.
    #[default]
    Null,
    Scalar(String),
    List(Vec<Value>),
}

impl Value {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Builds a list of scalars.
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::List(values.into_iter().map(|v| Self::Scalar(v.into())).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the scalar text; a one-element list of a scalar also counts.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value.as_str()),
            Self::List(items) if items.len() == 1 => items[0].as_str(),
            _ => None,
        }
    }

    /// Flattens into scalar strings; `Null` yields nothing.
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            Self::Null => Vec::new(),
            Self::Scalar(value) => vec![value.clone()],
            Self::List(items) => items.iter().flat_map(Value::to_strings).collect(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

/// Normalizes an attribute name for storage and lookup.
pub fn normalize_attribute_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Case-insensitive map of attribute name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, Value>",
    from = "BTreeMap<String, Value>"
)]
pub struct AttributeMap {
    entries: BTreeMap<String, Value>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value and returns the previous one under the same key.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.entries
            .insert(normalize_attribute_name(name), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(&normalize_attribute_name(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(&normalize_attribute_name(name))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_attribute_name(name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name.as_ref(), value);
        }
        map
    }
}

impl From<BTreeMap<String, Value>> for AttributeMap {
    fn from(value: BTreeMap<String, Value>) -> Self {
        value.into_iter().collect()
    }
}

impl From<AttributeMap> for BTreeMap<String, Value> {
    fn from(value: AttributeMap) -> Self {
        value.entries
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeMap, Value};

    #[test]
    fn keys_are_case_insensitive() {
        let mut map = AttributeMap::new();
        map.insert("Title", "first");
        assert_eq!(map.get("title"), Some(&Value::scalar("first")));
        assert_eq!(map.get("TITLE"), Some(&Value::scalar("first")));

        let previous = map.insert("TITLE", "second");
        assert_eq!(previous, Some(Value::scalar("first")));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn serializes_as_plain_json_object() {
        let map: AttributeMap = [
            ("Title", Value::scalar("hello")),
            ("subject", Value::list(["a", "b"])),
            ("missing", Value::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["title"], "hello");
        assert_eq!(json["subject"], serde_json::json!(["a", "b"]));
        assert!(json["missing"].is_null());

        let decoded: AttributeMap =
            serde_json::from_value(serde_json::json!({"TITLE": "hello"})).unwrap();
        assert_eq!(decoded.get("title"), Some(&Value::scalar("hello")));
    }

    #[test]
    fn as_str_accepts_single_element_list() {
        assert_eq!(Value::list(["x"]).as_str(), Some("x"));
        assert_eq!(Value::list(["x", "y"]).as_str(), None);
        assert_eq!(Value::Null.as_str(), None);
    }
}
