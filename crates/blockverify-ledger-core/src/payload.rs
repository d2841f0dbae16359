//! Payload: the metadata mapping carried by a record.
//!
//! A payload is an open set of string keys mapped to scalar values. Keys are
//! held in a `BTreeMap`, so iteration order (and therefore the canonical
//! encoding) never depends on insertion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CoreError;

/// A scalar payload value.
///
/// Floats are deliberately absent: canonical encoding has no stable float
/// form, so they are rejected at the JSON boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl PayloadValue {
    /// Get the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PayloadValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PayloadValue::Null => "null",
            PayloadValue::Bool(_) => "bool",
            PayloadValue::Integer(_) => "integer",
            PayloadValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadValue::Null => f.write_str("null"),
            PayloadValue::Bool(b) => write!(f, "{}", b),
            PayloadValue::Integer(i) => write!(f, "{}", i),
            PayloadValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(s: &str) -> Self {
        PayloadValue::Text(s.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(s: String) -> Self {
        PayloadValue::Text(s)
    }
}

impl From<bool> for PayloadValue {
    fn from(b: bool) -> Self {
        PayloadValue::Bool(b)
    }
}

impl From<i64> for PayloadValue {
    fn from(i: i64) -> Self {
        PayloadValue::Integer(i)
    }
}

impl From<i32> for PayloadValue {
    fn from(i: i32) -> Self {
        PayloadValue::Integer(i.into())
    }
}

impl From<u32> for PayloadValue {
    fn from(i: u32) -> Self {
        PayloadValue::Integer(i.into())
    }
}

/// The metadata mapping stored in a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, PayloadValue>);

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an entry, returning the previous value for the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PayloadValue>,
    ) -> Option<PayloadValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.0.get(key)
    }

    /// Get the value stored under `key` if it is text.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(PayloadValue::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<String>,
    V: Into<PayloadValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<serde_json::Value> for Payload {
    type Error = CoreError;

    /// Convert a JSON object of scalars into a payload.
    ///
    /// Floats, arrays and nested objects have no canonical form here and
    /// are rejected, naming the offending key.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(CoreError::MalformedPayload(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut payload = Payload::new();
        for (key, value) in object {
            let converted = match value {
                Value::Null => PayloadValue::Null,
                Value::Bool(b) => PayloadValue::Bool(b),
                Value::String(s) => PayloadValue::Text(s),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => PayloadValue::Integer(i),
                    None => {
                        return Err(CoreError::UnsupportedValue {
                            key,
                            kind: if n.is_u64() { "integer out of range" } else { "float" },
                        })
                    }
                },
                other => {
                    return Err(CoreError::UnsupportedValue {
                        key,
                        kind: json_kind(&other),
                    })
                }
            };
            payload.0.insert(key, converted);
        }
        Ok(payload)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_iteration_is_key_ordered() {
        let payload = Payload::new()
            .with("subject", "S1")
            .with("fingerprint", "abc123")
            .with("institution", "MIT");

        let keys: Vec<&str> = payload.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["fingerprint", "institution", "subject"]);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = Payload::new().with("a", 1).with("b", "two");
        let b = Payload::new().with("b", "two").with("a", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_contains_key_and_is_empty() {
        let empty = Payload::new();
        assert!(empty.is_empty());
        assert!(!empty.contains_key("fingerprint"));

        let payload = empty.with("fingerprint", "abc").with("note", PayloadValue::Null);
        assert!(!payload.is_empty());
        assert!(payload.contains_key("fingerprint"));
        assert!(payload.contains_key("note"));
        assert!(!payload.contains_key("subject"));
    }

    #[test]
    fn test_get_text() {
        let payload = Payload::new().with("fingerprint", "abc").with("count", 3);
        assert_eq!(payload.get_text("fingerprint"), Some("abc"));
        assert_eq!(payload.get_text("count"), None);
        assert_eq!(payload.get_text("missing"), None);
    }

    #[test]
    fn test_from_json_object() {
        let payload = Payload::try_from(json!({
            "fingerprint": "abc123",
            "year": 2024,
            "revoked": false,
            "note": null,
        }))
        .unwrap();

        assert_eq!(payload.len(), 4);
        assert_eq!(payload.get("year"), Some(&PayloadValue::Integer(2024)));
        assert_eq!(payload.get("revoked"), Some(&PayloadValue::Bool(false)));
        assert_eq!(payload.get("note"), Some(&PayloadValue::Null));
    }

    #[test]
    fn test_from_json_rejects_float() {
        let err = Payload::try_from(json!({"gpa": 3.5})).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsupportedValue { ref key, kind: "float" } if key == "gpa"
        ));
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = Payload::try_from(json!({"tags": ["a", "b"]})).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedValue { kind: "array", .. }));

        let err = Payload::try_from(json!({"meta": {"a": 1}})).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedValue { kind: "object", .. }));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = Payload::try_from(json!("just a string")).unwrap_err();
        assert!(matches!(err, CoreError::MalformedPayload(_)));
    }

    #[test]
    fn test_json_serialization_is_plain_object() {
        let payload = Payload::new().with("fingerprint", "abc").with("year", 2024);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"fingerprint": "abc", "year": 2024}));

        let back: Payload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }
}
