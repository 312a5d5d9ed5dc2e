//! Core types for the fixture-seed framework.
//!
//! This crate provides the foundational types shared by the generator and
//! the populators:
//!
//! - [`Schema`], [`ModelDescriptor`], [`FieldDescriptor`] - read-only schema snapshot
//! - [`FixtureValue`] / [`FixtureRecord`] - plain generated values
//! - [`Constraint`] / [`Overrides`] - relation selection rules and factory output
//! - [`FixtureConfig`] - YAML fixture files (schema plus static definitions)
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-generator  (builds and resolves the fixture graph)
//!    │
//!    └─── fixture-populate   (writes a resolved graph into a store)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{Constraint, FieldDescriptor, ModelDescriptor, Overrides, ScalarType, Schema};
//!
//! let schema = Schema::new(vec![ModelDescriptor::new(
//!     "Node",
//!     vec![
//!         FieldDescriptor::id("id"),
//!         FieldDescriptor::scalar("label", ScalarType::String),
//!         FieldDescriptor::relation("next", "Node"),
//!     ],
//! )]);
//! assert_eq!(schema.model_names(), vec!["Node"]);
//!
//! let overrides = Overrides::new()
//!     .set("label", "head")
//!     .set("next", Constraint::at_max(1));
//! assert_eq!(overrides.len(), 2);
//! ```

pub mod config;
pub mod constraint;
pub mod schema;
pub mod values;

// Re-exports for convenience
pub use config::{DefinitionConfig, FixtureConfig};
pub use constraint::{Constraint, FieldOverride, Overrides, DEFAULT_RELATION_LIMIT};
pub use schema::{
    FieldDescriptor, FieldKind, ModelDescriptor, ScalarType, Schema, SchemaError, StoreOperations,
};
pub use values::{FixtureRecord, FixtureValue};
