//! Materialization of fixture graphs into backing stores.
//!
//! A store implements [`FixtureStore`], exposing a create and an update
//! operation per model. The [`Materializer`] writes a resolved
//! [`FixtureGraph`](fixture_generator::FixtureGraph) in two sweeps: every
//! create first, then every relation connect.
//!
//! # Example
//!
//! ```ignore
//! use fixture_populate::{Materializer, RecordingStore};
//!
//! let graph = engine.build()?;
//! let store = RecordingStore::new();
//! let report = Materializer::new(&store).materialize(&graph).await?;
//! println!("{} created, {} connected", report.created, report.connected);
//! ```

pub mod args;
pub mod error;
pub mod jsonl;
pub mod materializer;
pub mod memory;
pub mod store;

pub use args::{CommonFixtureArgs, GenerateArgs, SeedArgs};
pub use error::{JsonlStoreError, MaterializeError};
pub use jsonl::JsonlStore;
pub use materializer::{MaterializeReport, Materializer};
pub use memory::{RecordingStore, StoreCall};
pub use store::{Connect, ConnectTarget, FixtureStore, Reference, UpdateRequest};
