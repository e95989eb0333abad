//! Metafeature Values

use serde::{Serialize, Serializer};
use std::fmt;

/// A single metafeature value.
///
/// Non-finite floats have no JSON representation and are written as
/// their string form (`"nan"`, `"inf"`, `"-inf"`).
#[derive(Debug, Clone, PartialEq)]
pub enum MetafeatureValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetafeatureValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetafeatureValue::Integer(i) => Some(*i as f64),
            MetafeatureValue::Float(f) => Some(*f),
            MetafeatureValue::Text(_) => None,
        }
    }

    /// Whether the value is a finite number
    pub fn is_finite(&self) -> bool {
        self.as_f64().is_some_and(f64::is_finite)
    }
}

impl fmt::Display for MetafeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetafeatureValue::Integer(i) => write!(f, "{i}"),
            MetafeatureValue::Float(v) if v.is_nan() => write!(f, "nan"),
            MetafeatureValue::Float(v) => write!(f, "{v}"),
            MetafeatureValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for MetafeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetafeatureValue::Integer(i) => serializer.serialize_i64(*i),
            MetafeatureValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            MetafeatureValue::Float(_) => serializer.collect_str(self),
            MetafeatureValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for MetafeatureValue {
    fn from(v: f64) -> Self {
        MetafeatureValue::Float(v)
    }
}

impl From<i64> for MetafeatureValue {
    fn from(v: i64) -> Self {
        MetafeatureValue::Integer(v)
    }
}

impl From<usize> for MetafeatureValue {
    fn from(v: usize) -> Self {
        MetafeatureValue::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<String> for MetafeatureValue {
    fn from(v: String) -> Self {
        MetafeatureValue::Text(v)
    }
}

impl From<&str> for MetafeatureValue {
    fn from(v: &str) -> Self {
        MetafeatureValue::Text(v.to_string())
    }
}
