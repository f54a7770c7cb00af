//! Property bags exchanged with the host and the UI layer
//!
//! A `PropertyBag` is an ordered, key-typed settings structure. Scene items
//! fill one with their type-specific fields; the host uses it as the settings
//! of the native source, and the UI renders it as an editable form.

use serde::{Deserialize, Serialize};

/// A single typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Get the type name for UI hints
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::List(_) => "list",
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(v: Vec<String>) -> Self {
        PropertyValue::List(v)
    }
}

/// A property whose value is out of range for the field it sets
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidProperty {
    pub key: String,
    pub value: String,
}

impl InvalidProperty {
    pub fn new(key: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for InvalidProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid value '{}' for property '{}'", self.value, self.key)
    }
}

impl std::error::Error for InvalidProperty {}

/// Ordered key/value settings bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any existing value under the same key in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style `set`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get a float, accepting integers as well
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            PropertyValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            PropertyValue::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys present in either bag whose values differ
    pub fn changed_keys<'a>(&'a self, other: &'a PropertyBag) -> Vec<&'a str> {
        let mut changed: Vec<&str> = self
            .entries
            .iter()
            .filter(|(k, v)| other.get(k) != Some(v))
            .map(|(k, _)| k.as_str())
            .collect();
        for (k, _) in &other.entries {
            if !self.contains(k) {
                changed.push(k.as_str());
            }
        }
        changed
    }

    /// JSON object form, as handed to hosts that take settings as JSON
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::to_value(v).unwrap_or(serde_json::Value::Null)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Build a bag from a JSON object. Non-object input yields an empty bag;
    /// nested objects and non-string arrays are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut bag = Self::new();
        if let Some(object) = value.as_object() {
            for (key, value) in object {
                if let Ok(value) = serde_json::from_value::<PropertyValue>(value.clone()) {
                    bag.set(key.clone(), value);
                }
            }
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut bag = PropertyBag::new();
        bag.set("monitor", 0i64);
        bag.set("capture_cursor", true);
        bag.set("monitor", 2i64);
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get_int("monitor"), Some(2));
        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["monitor", "capture_cursor"]);
    }

    #[test]
    fn test_typed_getters() {
        let bag = PropertyBag::new()
            .with("input", "rtsp://cam1/stream")
            .with("close_when_inactive", true)
            .with("volume", 0.5)
            .with("monitor", 1i64);
        assert_eq!(bag.get_str("input"), Some("rtsp://cam1/stream"));
        assert_eq!(bag.get_bool("close_when_inactive"), Some(true));
        assert_eq!(bag.get_float("volume"), Some(0.5));
        assert_eq!(bag.get_float("monitor"), Some(1.0));
        assert_eq!(bag.get_int("input"), None);
        assert_eq!(bag.get_str("missing"), None);
    }

    #[test]
    fn test_changed_keys() {
        let a = PropertyBag::new().with("input", "a").with("close_when_inactive", true);
        let b = PropertyBag::new().with("input", "b").with("close_when_inactive", true).with("extra", 1i64);
        let changed = a.changed_keys(&b);
        assert_eq!(changed, vec!["input", "extra"]);
        assert!(a.changed_keys(&a.clone()).is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let bag = PropertyBag::new()
            .with("window", "Notepad")
            .with("method", 2i64)
            .with("cursor", false)
            .with("devices", vec!["a".to_string(), "b".to_string()]);
        let json = bag.to_json();
        assert_eq!(json["window"], "Notepad");
        assert_eq!(json["method"], 2);

        let back = PropertyBag::from_json(&json);
        assert_eq!(back.get_str("window"), Some("Notepad"));
        assert_eq!(back.get_int("method"), Some(2));
        assert_eq!(back.get_bool("cursor"), Some(false));
        assert_eq!(back.get_list("devices").map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_remove() {
        let mut bag = PropertyBag::new().with("a", 1i64).with("b", 2i64);
        assert_eq!(bag.remove("a"), Some(PropertyValue::Int(1)));
        assert!(!bag.contains("a"));
        assert!(bag.remove("a").is_none());
    }
}
