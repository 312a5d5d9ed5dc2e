//! Relation constraints and per-field overrides.

use crate::values::FixtureValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of related instances selected when a relation has no constraint.
pub const DEFAULT_RELATION_LIMIT: usize = 5;

/// Rule governing how many related identifiers a relation field selects.
///
/// Serialized as `{ type: AT_MAX, value: 2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Constraint {
    /// Select at most `n` distinct related instances.
    AtMax(usize),
    /// Select all related instances when at least `n` exist, otherwise
    /// whatever exists. Either way this yields the whole candidate pool.
    AtLeastIfExisting(usize),
}

impl Constraint {
    /// Select at most `n` related instances.
    pub fn at_max(n: usize) -> Self {
        Self::AtMax(n)
    }

    /// Select at least `n` related instances if that many exist.
    pub fn at_least_if_existing(n: usize) -> Self {
        Self::AtLeastIfExisting(n)
    }

    /// The constraint's count parameter.
    pub fn value(&self) -> usize {
        match self {
            Self::AtMax(n) | Self::AtLeastIfExisting(n) => *n,
        }
    }

    /// How many ids to take from a pool of `pool_size` candidates.
    pub fn selection_size(&self, pool_size: usize) -> usize {
        match *self {
            Self::AtMax(n) => n.min(pool_size),
            Self::AtLeastIfExisting(n) => {
                if pool_size >= n {
                    pool_size
                } else {
                    // Capped at the pool below, so this still takes everything.
                    n.min(pool_size)
                }
            }
        }
    }
}

impl Default for Constraint {
    fn default() -> Self {
        Self::AtMax(DEFAULT_RELATION_LIMIT)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtMax(n) => write!(f, "AT_MAX({n})"),
            Self::AtLeastIfExisting(n) => write!(f, "AT_LEAST_IF_EXISTING({n})"),
        }
    }
}

/// Value a factory supplies for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOverride {
    /// Selection rule for a relation field
    Constraint(Constraint),
    /// Literal value for a scalar field
    Value(FixtureValue),
}

impl From<Constraint> for FieldOverride {
    fn from(constraint: Constraint) -> Self {
        Self::Constraint(constraint)
    }
}

macro_rules! impl_value_override {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldOverride {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_value_override!(
    FixtureValue,
    bool,
    i32,
    i64,
    u64,
    f64,
    &str,
    String,
    chrono::DateTime<chrono::Utc>,
);

/// Partial field mapping produced by a factory. Fields left out are
/// generated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides(BTreeMap<String, FieldOverride>);

impl Overrides {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a literal value or a constraint.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<FieldOverride>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Insert in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldOverride>) {
        self.0.insert(field.into(), value.into());
    }

    /// Remove and return the override for a field.
    pub fn take(&mut self, field: &str) -> Option<FieldOverride> {
        self.0.remove(field)
    }

    /// Get the override for a field.
    pub fn get(&self, field: &str) -> Option<&FieldOverride> {
        self.0.get(field)
    }

    /// Field names with an override.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of overridden fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
