//! fixture-seed: generate related fixture data and seed it into stores.
//!
//! The workspace is split the same way the data flows:
//!
//! - `fixture-core`: schema, values, constraints and fixture files
//! - `fixture-generator`: the seeded engine building resolved fixture graphs
//! - `fixture-populate`: store trait, stores and the two-pass materializer
//!
//! This crate wires them together for the `fixture-seed` binary and for
//! callers that start from a fixture file.

use anyhow::Context;
use fixture_core::{FixtureConfig, FixtureRecord};
use fixture_generator::{EngineOptions, FixtureDefinitionRegistry, FixtureEngine};
use fixture_populate::{FixtureStore, MaterializeReport, Materializer};
use std::collections::BTreeMap;
use std::path::Path;

pub use fixture_core;
pub use fixture_generator;
pub use fixture_populate;

/// Load a fixture file.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<FixtureConfig> {
    let path = path.as_ref();
    FixtureConfig::from_file(path)
        .with_context(|| format!("Failed to load fixture file from {path:?}"))
}

/// Engine for a fixture file's models and static definitions.
pub fn engine_from_config(config: &FixtureConfig, seed: u64) -> FixtureEngine {
    FixtureEngine::new(config.schema(), EngineOptions::default().with_seed(seed))
        .with_definitions(FixtureDefinitionRegistry::from_config(&config.definitions))
}

/// Resolved fixtures per model, without touching any store.
pub fn generate_fixtures(
    config: &FixtureConfig,
    seed: u64,
) -> anyhow::Result<BTreeMap<String, Vec<FixtureRecord>>> {
    let fixtures = engine_from_config(config, seed)
        .get_fixtures()
        .context("Failed to build fixtures")?;
    Ok(fixtures)
}

/// Build a graph with `engine` and materialize it into `store`.
pub async fn seed_store<S: FixtureStore + ?Sized>(
    engine: &mut FixtureEngine,
    store: &S,
) -> anyhow::Result<MaterializeReport> {
    let graph = engine.build().context("Failed to build fixtures")?;
    let report = Materializer::new(store)
        .materialize(&graph)
        .await
        .context("Failed to materialize fixtures")?;
    Ok(report)
}
