//! Fixture graph generator for fixture-seed.
//!
//! This crate turns a [`Schema`](fixture_core::Schema) plus optional per-model
//! definitions into a deterministic graph of fixture instances whose
//! relation fields point at other generated instances.
//!
//! # Architecture
//!
//! ```text
//! Schema + FixtureDefinitionRegistry
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │    FixtureEngine     │
//! │                      │
//! │  - RandomValueProvider (StdRng)
//! │  - IdGenerator       │
//! │  - InternalIdAllocator
//! └──────────┬───────────┘
//!            │  build pass: scalars + pending bindings, pool filled
//!            │  resolve pass: ConstraintResolver over the full pool
//!            ▼
//!      FixtureGraph { entities, pool }
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{FieldDescriptor, ModelDescriptor, Overrides, ScalarType, Schema};
//! use fixture_generator::{
//!     EngineOptions, FixtureDefinition, FixtureDefinitionRegistry, FixtureEngine,
//!     RandomValueProvider,
//! };
//!
//! let schema = Schema::new(vec![
//!     ModelDescriptor::new(
//!         "User",
//!         vec![
//!             FieldDescriptor::id("id"),
//!             FieldDescriptor::scalar("name", ScalarType::String),
//!             FieldDescriptor::relation("posts", "Post").list(),
//!         ],
//!     ),
//!     ModelDescriptor::new(
//!         "Post",
//!         vec![
//!             FieldDescriptor::id("id"),
//!             FieldDescriptor::relation("author", "User"),
//!         ],
//!     ),
//! ]);
//!
//! let mut engine = FixtureEngine::new(schema, EngineOptions::default()).define(|registry| {
//!     registry.define(
//!         "User",
//!         FixtureDefinition::new().factory(|random: &mut RandomValueProvider| {
//!             Overrides::new()
//!                 .set("name", random.first_name())
//!                 .set("posts", FixtureDefinitionRegistry::at_max(2))
//!         }),
//!     );
//! });
//!
//! let fixtures = engine.get_fixtures().unwrap();
//! assert_eq!(fixtures["User"].len(), 5);
//! ```

pub mod engine;
pub mod error;
pub mod generators;
pub mod graph;
pub mod id;
pub mod random;
pub mod registry;
pub mod resolver;

pub use engine::{EngineOptions, FixtureEngine};
pub use error::{FixtureError, FixtureResult};
pub use graph::{BindingState, EntityRecord, FixtureGraph, RelationBinding};
pub use id::{IdGenerator, InternalId, InternalIdAllocator, SequentialIdGenerator};
pub use random::{RandomValueProvider, DEFAULT_SEED};
pub use registry::{FactoryFn, FixtureDefinition, FixtureDefinitionRegistry, DEFAULT_AMOUNT};
pub use resolver::{ConstraintResolver, RelationPool};
