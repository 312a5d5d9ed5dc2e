//! Value representations for generated fixtures.
//!
//! `FixtureValue` is the plain, store-agnostic value produced by the
//! generator and returned to callers. A [`FixtureRecord`] is one generated
//! instance: field name to value, with relation fields expanded to the
//! related instances' scalar records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One generated instance, keyed by field name.
pub type FixtureRecord = BTreeMap<String, FixtureValue>;

/// Generated value.
///
/// Serialized untagged so records read as plain JSON/YAML documents.
/// Variant order matters for deserialization: integers are tried before
/// floats and timestamps before free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureValue {
    /// Null value (a single relation with nothing to select)
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point
    Float(f64),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),

    /// String value
    String(String),

    /// List of values (list relations)
    List(Vec<FixtureValue>),

    /// Nested record (resolved single relation)
    Record(FixtureRecord),
}

impl FixtureValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a timestamp.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Try to get this value as a list.
    pub fn as_list(&self) -> Option<&[FixtureValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get this value as a nested record.
    pub fn as_record(&self) -> Option<&FixtureRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Key used to detect duplicate values of a unique field.
    ///
    /// Distinguishes variants, so `Int(1)` and `String("1")` do not collide.
    pub fn unique_key(&self) -> String {
        format!("{self:?}")
    }
}

impl fmt::Display for FixtureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => write!(f, "[{} items]", items.len()),
            Self::Record(record) => write!(f, "{{{} fields}}", record.len()),
        }
    }
}

impl From<bool> for FixtureValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FixtureValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<i64> for FixtureValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for FixtureValue {
    fn from(value: u64) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for FixtureValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FixtureValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FixtureValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for FixtureValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Vec<FixtureValue>> for FixtureValue {
    fn from(value: Vec<FixtureValue>) -> Self {
        Self::List(value)
    }
}

impl From<FixtureRecord> for FixtureValue {
    fn from(value: FixtureRecord) -> Self {
        Self::Record(value)
    }
}
