//! Error types for fixture materialization.

use thiserror::Error;

/// Errors that can occur while materializing a fixture graph.
#[derive(Error, Debug)]
pub enum MaterializeError {
    /// A store call failed. Passed through unchanged.
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    /// Model has relations to connect (or is a relation target) but no
    /// unique `id` field to address its instances by.
    #[error("Model '{0}' has no unique id field to reference instances by")]
    MissingIdentifier(String),
}

/// Errors from the JSONL store.
#[derive(Error, Debug)]
pub enum JsonlStoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
