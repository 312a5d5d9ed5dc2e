//! In-memory store recording every call in order.

use crate::store::{FixtureStore, UpdateRequest};
use anyhow::{bail, Result};
use fixture_core::FixtureRecord;
use tokio::sync::Mutex;

/// One captured store call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create {
        operation: String,
        data: FixtureRecord,
    },
    Update {
        operation: String,
        request: UpdateRequest,
    },
}

impl StoreCall {
    /// Operation name the call was made with.
    pub fn operation(&self) -> &str {
        match self {
            Self::Create { operation, .. } | Self::Update { operation, .. } => operation,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }
}

/// Store that keeps every call in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    fail_on: Option<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `operation` fail after being recorded.
    pub fn failing_on(mut self, operation: impl Into<String>) -> Self {
        self.fail_on = Some(operation.into());
        self
    }

    /// Snapshot of the calls so far.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls so far.
    pub async fn len(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn record(&self, call: StoreCall) -> Result<()> {
        let operation = call.operation().to_string();
        self.calls.lock().await.push(call);

        if self.fail_on.as_deref() == Some(operation.as_str()) {
            bail!("Store rejected operation '{operation}'");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl FixtureStore for RecordingStore {
    async fn create(&self, operation: &str, data: &FixtureRecord) -> Result<()> {
        self.record(StoreCall::Create {
            operation: operation.to_string(),
            data: data.clone(),
        })
        .await
    }

    async fn update(&self, operation: &str, request: &UpdateRequest) -> Result<()> {
        self.record(StoreCall::Update {
            operation: operation.to_string(),
            request: request.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Reference;
    use fixture_core::FixtureValue;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_records_in_order() {
        let store = RecordingStore::new();
        store.create("createUser", &FixtureRecord::new()).await.unwrap();
        store
            .update(
                "updateUser",
                &UpdateRequest {
                    target: Reference::new("id", FixtureValue::Int(1)),
                    data: BTreeMap::new(),
                },
            )
            .await
            .unwrap();

        let calls = store.calls().await;
        assert_eq!(calls.len(), 2);
        assert!(calls[0].is_create());
        assert_eq!(calls[1].operation(), "updateUser");
    }

    #[tokio::test]
    async fn test_failing_operation() {
        let store = RecordingStore::new().failing_on("createPost");

        assert!(store.create("createUser", &FixtureRecord::new()).await.is_ok());
        let err = store
            .create("createPost", &FixtureRecord::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("createPost"));
        assert_eq!(store.len().await, 2);
    }
}
