//! FixtureStore trait and update payload types.
//!
//! A store exposes two operations per model, named by the model's
//! [`StoreOperations`](fixture_core::StoreOperations): one creating an
//! instance from its scalar fields, one connecting the relations of an
//! existing instance. The payload of the latter serializes as
//!
//! ```json
//! { "where": { "id": 1 }, "data": { "posts": { "connect": [{ "id": 6 }] } } }
//! ```

use anyhow::Result;
use fixture_core::{FixtureRecord, FixtureValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies one stored instance by its identifier field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(FixtureRecord);

impl Reference {
    /// Reference by `field = value`.
    pub fn new(field: impl Into<String>, value: FixtureValue) -> Self {
        let mut record = FixtureRecord::new();
        record.insert(field.into(), value);
        Self(record)
    }

    /// The referenced identifier value for `field`, if present.
    pub fn get(&self, field: &str) -> Option<&FixtureValue> {
        self.0.get(field)
    }
}

/// Target of a connect: one reference for a non-list relation, a sequence
/// for a list relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectTarget {
    One(Reference),
    Many(Vec<Reference>),
}

/// Relation-connect payload for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connect {
    pub connect: ConnectTarget,
}

impl Connect {
    /// Connect a single related instance.
    pub fn one(reference: Reference) -> Self {
        Self {
            connect: ConnectTarget::One(reference),
        }
    }

    /// Connect a sequence of related instances.
    pub fn many(references: Vec<Reference>) -> Self {
        Self {
            connect: ConnectTarget::Many(references),
        }
    }

    /// Number of referenced instances.
    pub fn len(&self) -> usize {
        match &self.connect {
            ConnectTarget::One(_) => 1,
            ConnectTarget::Many(refs) => refs.len(),
        }
    }

    /// Whether no instance is referenced.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Argument of a model's update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Instance being updated
    #[serde(rename = "where")]
    pub target: Reference,
    /// Relation field name to connect payload
    pub data: BTreeMap<String, Connect>,
}

/// Backing store written by the materializer.
///
/// Calls are issued sequentially; implementations need not order or batch
/// them. Errors are propagated to the caller unchanged.
#[async_trait::async_trait]
pub trait FixtureStore: Send + Sync {
    /// Invoke the create operation `operation` with an instance's scalar
    /// fields.
    async fn create(&self, operation: &str, data: &FixtureRecord) -> Result<()>;

    /// Invoke the update operation `operation` to connect relations.
    async fn update(&self, operation: &str, request: &UpdateRequest) -> Result<()>;

    /// Persist any buffered calls. Called once a materialization ends,
    /// whether it succeeded or not.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_shape() {
        let mut data = BTreeMap::new();
        data.insert(
            "author".to_string(),
            Connect::one(Reference::new("id", FixtureValue::Int(3))),
        );
        data.insert(
            "tags".to_string(),
            Connect::many(vec![
                Reference::new("id", FixtureValue::Int(7)),
                Reference::new("id", FixtureValue::Int(9)),
            ]),
        );
        let request = UpdateRequest {
            target: Reference::new("id", FixtureValue::Int(1)),
            data,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "where": { "id": 1 },
                "data": {
                    "author": { "connect": { "id": 3 } },
                    "tags": { "connect": [{ "id": 7 }, { "id": 9 }] }
                }
            })
        );
    }

    #[test]
    fn test_connect_len() {
        assert_eq!(Connect::one(Reference::new("id", 1.into())).len(), 1);
        assert!(Connect::many(vec![]).is_empty());
    }
}
