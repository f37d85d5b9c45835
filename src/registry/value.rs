//! Storable status values.
//!
//! # Design Decisions
//! - Closed set of kinds: null, bool, integer, float, string, list
//! - Maps are never values; nesting is expressed by the path tree only
//! - Serialized untagged so exports are plain JSON

use serde::Serialize;

use crate::registry::error::StatusError;

/// A value that can be stored at a leaf of the status tree.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum StatusValue {
    /// Absent value (a dynamic entry before its first refresh).
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<StatusValue>),
}

impl StatusValue {
    /// Check the value can be stored and exported.
    ///
    /// Non-finite floats have no JSON encoding and are rejected.
    pub fn validate(&self) -> Result<(), StatusError> {
        match self {
            StatusValue::Float(f) if !f.is_finite() => Err(StatusError::UnsupportedValueType(
                format!("non-finite float {}", f),
            )),
            StatusValue::List(items) => items.iter().try_for_each(StatusValue::validate),
            _ => Ok(()),
        }
    }

    /// True for the zero value of each kind.
    ///
    /// `Registry::get` treats falsy values like missing ones.
    pub fn is_falsy(&self) -> bool {
        match self {
            StatusValue::Null => true,
            StatusValue::Bool(b) => !b,
            StatusValue::Int(i) => *i == 0,
            StatusValue::Float(f) => *f == 0.0,
            StatusValue::String(s) => s.is_empty(),
            StatusValue::List(items) => items.is_empty(),
        }
    }
}

impl From<bool> for StatusValue {
    fn from(b: bool) -> Self {
        StatusValue::Bool(b)
    }
}

impl From<i64> for StatusValue {
    fn from(i: i64) -> Self {
        StatusValue::Int(i)
    }
}

impl From<i32> for StatusValue {
    fn from(i: i32) -> Self {
        StatusValue::Int(i64::from(i))
    }
}

impl From<u32> for StatusValue {
    fn from(i: u32) -> Self {
        StatusValue::Int(i64::from(i))
    }
}

impl From<f64> for StatusValue {
    fn from(f: f64) -> Self {
        StatusValue::Float(f)
    }
}

impl From<&str> for StatusValue {
    fn from(s: &str) -> Self {
        StatusValue::String(s.to_string())
    }
}

impl From<String> for StatusValue {
    fn from(s: String) -> Self {
        StatusValue::String(s)
    }
}

impl<T: Into<StatusValue>> From<Vec<T>> for StatusValue {
    fn from(items: Vec<T>) -> Self {
        StatusValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<StatusValue>> From<Option<T>> for StatusValue {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(StatusValue::Null)
    }
}

impl TryFrom<serde_json::Value> for StatusValue {
    type Error = StatusError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        let converted = match value {
            Value::Null => StatusValue::Null,
            Value::Bool(b) => StatusValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => StatusValue::Int(i),
                // u64 above i64::MAX and real numbers both land here
                None => match n.as_f64() {
                    Some(f) => StatusValue::Float(f),
                    None => {
                        return Err(StatusError::UnsupportedValueType(format!("number {}", n)))
                    }
                },
            },
            Value::String(s) => StatusValue::String(s),
            Value::Array(items) => StatusValue::List(
                items
                    .into_iter()
                    .map(StatusValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(_) => {
                return Err(StatusError::UnsupportedValueType("object".to_string()))
            }
        };
        converted.validate()?;
        Ok(converted)
    }
}
