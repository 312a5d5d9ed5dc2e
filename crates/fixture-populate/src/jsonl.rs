//! JSONL store: one JSON line per store call.
//!
//! Each line has the form `{"operation": "...", "payload": {...}}`, where
//! the payload is the scalar record of a create or the [`UpdateRequest`] of
//! an update. Replaying the file in order reproduces the materialization.

use crate::error::JsonlStoreError;
use crate::store::{FixtureStore, UpdateRequest};
use anyhow::Result;
use fixture_core::FixtureRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default buffer size for JSONL writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

#[derive(Serialize)]
struct Line<'a, P: Serialize> {
    operation: &'a str,
    payload: &'a P,
}

struct Writer {
    inner: BufWriter<File>,
    lines: u64,
}

/// Store writing every call to a JSONL file.
pub struct JsonlStore {
    path: PathBuf,
    writer: Mutex<Writer>,
}

impl JsonlStore {
    /// Create (or truncate) the output file.
    pub async fn create<P: AsRef<Path>>(path: P) -> Result<Self, JsonlStoreError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).await?;
        info!("Writing fixture store calls to '{}'", path.display());

        Ok(Self {
            path,
            writer: Mutex::new(Writer {
                inner: BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file),
                lines: 0,
            }),
        })
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered lines and return how many were written in total.
    pub async fn finish(&self) -> Result<u64, JsonlStoreError> {
        let mut writer = self.writer.lock().await;
        writer.inner.flush().await?;
        debug!("Flushed {} lines to '{}'", writer.lines, self.path.display());
        Ok(writer.lines)
    }

    async fn write_line<P: Serialize>(
        &self,
        operation: &str,
        payload: &P,
    ) -> Result<(), JsonlStoreError> {
        let mut line = serde_json::to_vec(&Line { operation, payload })?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.inner.write_all(&line).await?;
        writer.lines += 1;
        Ok(())
    }
}

impl std::fmt::Debug for JsonlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl FixtureStore for JsonlStore {
    async fn create(&self, operation: &str, data: &FixtureRecord) -> Result<()> {
        Ok(self.write_line(operation, data).await?)
    }

    async fn update(&self, operation: &str, request: &UpdateRequest) -> Result<()> {
        Ok(self.write_line(operation, request).await?)
    }

    async fn flush(&self) -> Result<()> {
        self.finish().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Connect, Reference};
    use fixture_core::FixtureValue;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_one_line_per_call() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("store.jsonl");
        let store = JsonlStore::create(&output_path).await.unwrap();

        let mut record = FixtureRecord::new();
        record.insert("id".to_string(), FixtureValue::Int(1));
        record.insert("name".to_string(), FixtureValue::from("Ada"));
        store.create("createUser", &record).await.unwrap();

        let mut data = BTreeMap::new();
        data.insert(
            "posts".to_string(),
            Connect::many(vec![Reference::new("id", FixtureValue::Int(2))]),
        );
        store
            .update(
                "updateUser",
                &UpdateRequest {
                    target: Reference::new("id", FixtureValue::Int(1)),
                    data,
                },
            )
            .await
            .unwrap();

        assert_eq!(store.finish().await.unwrap(), 2);

        let content = std::fs::read_to_string(&output_path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["operation"], "createUser");
        assert_eq!(lines[0]["payload"]["name"], "Ada");
        assert_eq!(lines[1]["payload"]["where"]["id"], 1);
        assert_eq!(lines[1]["payload"]["data"]["posts"]["connect"][0]["id"], 2);
    }

    #[tokio::test]
    async fn test_create_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = JsonlStore::create(temp_dir.path().join("missing/store.jsonl")).await;
        assert!(matches!(result, Err(JsonlStoreError::Io(_))));
    }
}
