//! Typed metadata attached to records.
//!
//! Metadata is a small JSON-like value tree. Unlike JSON it has no `null`:
//! a record without metadata simply carries `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Metadata value stored alongside a record vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Metadata {
    /// UTF-8 text.
    Text(String),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean flag.
    Boolean(bool),
    /// Ordered list of values.
    Array(Vec<Metadata>),
    /// String-keyed map of values, ordered by key.
    Object(BTreeMap<String, Metadata>),
}

impl Metadata {
    /// Returns a short name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Returns the text value, if this is `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is `Integer`.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is `Boolean`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Looks up a key when this is an `Object`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Metadata> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Converts a JSON value into metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMetadata`] if the value is or contains `null`,
    /// or holds a number that fits neither `i64` nor `f64`.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Err(Error::InvalidMetadata(
                "null is not a metadata value".to_string(),
            )),
            JsonValue::Bool(b) => Ok(Self::Boolean(b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(Error::InvalidMetadata(format!("unsupported number {n}")))
                }
            }
            JsonValue::String(s) => Ok(Self::Text(s)),
            JsonValue::Array(items) => items
                .into_iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Self::Array),
            JsonValue::Object(map) => map
                .into_iter()
                .map(|(k, v)| Self::from_json(v).map(|v| (k, v)))
                .collect::<Result<BTreeMap<_, _>>>()
                .map(Self::Object),
        }
    }

    /// Converts this metadata into a JSON value.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Integer(i) => JsonValue::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(JsonValue::Null, JsonValue::Number),
            Self::Boolean(b) => JsonValue::Bool(*b),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<JsonValue> for Metadata {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_json(value)
    }
}

impl From<&Metadata> for JsonValue {
    fn from(metadata: &Metadata) -> Self {
        metadata.to_json()
    }
}

impl From<String> for Metadata {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Metadata {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Metadata {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Metadata {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Metadata {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Metadata {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Metadata {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<bool> for Metadata {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<Metadata>> From<Vec<T>> for Metadata {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Metadata>> From<BTreeMap<K, V>> for Metadata {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Object(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
