//! Fixture graph builder.
//!
//! Building happens in two passes:
//!
//! 1. **Build**: for every model in schema order, create `amount` entities.
//!    Scalars are taken from the factory or generated; relation fields become
//!    pending bindings. Each entity's id is appended to its model's pool as
//!    soon as the entity exists.
//! 2. **Resolve**: once every pool is complete, each pending binding is
//!    resolved exactly once, in creation order.
//!
//! Because no binding is evaluated before all pools are full, relations may
//! point forward, backward, or at their own model without any ordering of
//! the schema.

use crate::error::{FixtureError, FixtureResult};
use crate::generators::timestamp;
use crate::graph::{EntityRecord, FixtureGraph, RelationBinding};
use crate::id::{IdGenerator, InternalIdAllocator, SequentialIdGenerator};
use crate::random::{RandomValueProvider, DEFAULT_SEED};
use crate::registry::FixtureDefinitionRegistry;
use crate::resolver::ConstraintResolver;
use chrono::{DateTime, Utc};
use fixture_core::{
    Constraint, FieldDescriptor, FieldKind, FieldOverride, FixtureRecord, FixtureValue,
    ModelDescriptor, ScalarType, Schema,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Engine construction options.
pub struct EngineOptions {
    /// Seed for every random decision
    pub seed: u64,
    /// Reference instant that generated `date_time` values precede
    pub date_anchor: DateTime<Utc>,
    /// Generator for unique `id` fields
    pub id_generator: Box<dyn IdGenerator>,
}

impl EngineOptions {
    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the date anchor.
    pub fn with_date_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.date_anchor = anchor;
        self
    }

    /// Replace the generator for unique `id` fields.
    pub fn with_id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Box::new(generator);
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            date_anchor: timestamp::default_anchor(),
            id_generator: Box::new(SequentialIdGenerator::new()),
        }
    }
}

impl std::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("seed", &self.seed)
            .field("date_anchor", &self.date_anchor)
            .finish_non_exhaustive()
    }
}

/// Values already used per unique field, keyed by (model, field).
#[derive(Default)]
struct UniqueValues {
    seen: HashMap<(String, String), HashSet<String>>,
}

impl UniqueValues {
    fn claim(&mut self, model: &str, field: &str, value: &FixtureValue) -> FixtureResult<()> {
        let inserted = self
            .seen
            .entry((model.to_string(), field.to_string()))
            .or_default()
            .insert(value.unique_key());

        if inserted {
            Ok(())
        } else {
            Err(FixtureError::DuplicateUniqueValue {
                model: model.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            })
        }
    }
}

/// Builds and resolves fixture graphs for one schema.
///
/// The engine owns its seeded provider, both identifier generators and the
/// definition registry. Building again continues the same random stream and
/// id counters, so every graph from one engine has fresh internal ids.
pub struct FixtureEngine {
    schema: Arc<Schema>,
    registry: FixtureDefinitionRegistry,
    random: RandomValueProvider,
    ids: Box<dyn IdGenerator>,
    internal_ids: InternalIdAllocator,
}

impl FixtureEngine {
    /// Create an engine where every model uses the default definition.
    pub fn new(schema: Schema, options: EngineOptions) -> Self {
        let random = RandomValueProvider::new(options.seed).with_date_anchor(options.date_anchor);
        Self {
            schema: Arc::new(schema),
            registry: FixtureDefinitionRegistry::new(),
            random,
            ids: options.id_generator,
            internal_ids: InternalIdAllocator::new(),
        }
    }

    /// Use `registry` for per-model overrides.
    pub fn with_definitions(mut self, registry: FixtureDefinitionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register definitions through a callback, mirroring how factories are
    /// usually declared in one place.
    pub fn define<F>(mut self, define: F) -> Self
    where
        F: FnOnce(&mut FixtureDefinitionRegistry),
    {
        define(&mut self.registry);
        self
    }

    /// Schema snapshot.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Seed the engine was created with.
    pub fn seed(&self) -> u64 {
        self.random.seed()
    }

    /// Build a fully resolved fixture graph.
    pub fn build(&mut self) -> FixtureResult<FixtureGraph> {
        let schema = Arc::clone(&self.schema);
        for model in self.registry.model_names() {
            if schema.get_model(model).is_none() {
                warn!("Ignoring fixture definition for unknown model '{}'", model);
            }
        }

        info!(
            "Building fixtures for {} models (seed={})",
            schema.models.len(),
            self.random.seed()
        );

        let mut graph = FixtureGraph::new(Arc::clone(&schema));
        let mut unique = UniqueValues::default();

        for model in &schema.models {
            let amount = self.registry.amount_for(&model.name);
            for _ in 0..amount {
                let entity = self.build_entity(model, &mut unique)?;
                graph.insert(entity);
            }
            debug!("Built {} instances of '{}'", amount, model.name);
        }

        self.resolve_relations(&mut graph)?;

        info!("Fixture graph complete: {} entities", graph.len());
        Ok(graph)
    }

    /// Build a graph and return its plain records per model.
    pub fn get_fixtures(&mut self) -> FixtureResult<BTreeMap<String, Vec<FixtureRecord>>> {
        Ok(self.build()?.fixtures())
    }

    fn build_entity(
        &mut self,
        model: &ModelDescriptor,
        unique: &mut UniqueValues,
    ) -> FixtureResult<EntityRecord> {
        let mut overrides = self.registry.produce(&model.name, &mut self.random);
        let mut scalars = FixtureRecord::new();
        let mut relations = Vec::new();

        for field in &model.fields {
            let supplied = overrides.take(&field.name);
            match &field.kind {
                FieldKind::Scalar(scalar) => {
                    let value = match supplied {
                        Some(FieldOverride::Value(value)) => value,
                        None => self.generate_scalar(model, field, *scalar)?,
                        Some(FieldOverride::Constraint(_)) => {
                            return Err(mismatch(model, field, "a value"))
                        }
                    };
                    if field.unique {
                        unique.claim(&model.name, &field.name, &value)?;
                    }
                    scalars.insert(field.name.clone(), value);
                }
                FieldKind::Relation(target) => {
                    let constraint = match supplied {
                        Some(FieldOverride::Constraint(constraint)) => constraint,
                        None if field.unique => return Err(unsupported(model, field)),
                        None => Constraint::default(),
                        Some(FieldOverride::Value(_)) => {
                            return Err(mismatch(model, field, "a constraint"))
                        }
                    };
                    relations.push(RelationBinding::pending(
                        field.name.clone(),
                        target.clone(),
                        field.list,
                        constraint,
                    ));
                }
            }
        }

        for name in overrides.field_names() {
            warn!(
                "Ignoring override for unknown field '{}.{}'",
                model.name, name
            );
        }

        Ok(EntityRecord {
            id: self.internal_ids.allocate(),
            model: model.name.clone(),
            scalars,
            relations,
        })
    }

    fn generate_scalar(
        &mut self,
        model: &ModelDescriptor,
        field: &FieldDescriptor,
        scalar: ScalarType,
    ) -> FixtureResult<FixtureValue> {
        if !field.unique {
            return Ok(self.random.scalar(scalar));
        }

        match scalar {
            ScalarType::Id => Ok(self.ids.generate()),
            ScalarType::String => Ok(FixtureValue::String(self.random.token())),
            _ => Err(unsupported(model, field)),
        }
    }

    fn resolve_relations(&mut self, graph: &mut FixtureGraph) -> FixtureResult<()> {
        let resolver = ConstraintResolver::new(&graph.pool);
        let random = &mut self.random;
        let mut resolved = 0usize;

        for entity in graph.entities.values_mut() {
            for binding in &mut entity.relations {
                binding.resolve_with(|target, constraint| {
                    resolver.resolve(target, constraint, random)
                })?;
                resolved += 1;
            }
        }

        debug!("Resolved {} relation bindings", resolved);
        Ok(())
    }
}

impl std::fmt::Debug for FixtureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureEngine")
            .field("models", &self.schema.model_names())
            .field("random", &self.random)
            .finish_non_exhaustive()
    }
}

fn unsupported(model: &ModelDescriptor, field: &FieldDescriptor) -> FixtureError {
    FixtureError::UnsupportedFieldType {
        model: model.name.clone(),
        field: field.name.clone(),
        field_type: field.kind.to_string(),
    }
}

fn mismatch(
    model: &ModelDescriptor,
    field: &FieldDescriptor,
    expected: &'static str,
) -> FixtureError {
    FixtureError::OverrideKindMismatch {
        model: model.name.clone(),
        field: field.name.clone(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FixtureDefinition;
    use fixture_core::Overrides;

    fn blog_schema() -> Schema {
        Schema::new(vec![
            ModelDescriptor::new(
                "User",
                vec![
                    FieldDescriptor::id("id"),
                    FieldDescriptor::scalar("name", ScalarType::String),
                    FieldDescriptor::relation("posts", "Post").list(),
                ],
            ),
            ModelDescriptor::new(
                "Post",
                vec![
                    FieldDescriptor::id("id"),
                    FieldDescriptor::scalar("title", ScalarType::String),
                    FieldDescriptor::relation("author", "User"),
                ],
            ),
        ])
    }

    #[test]
    fn test_default_amounts() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default());
        let fixtures = engine.get_fixtures().unwrap();

        assert_eq!(fixtures["User"].len(), 5);
        assert_eq!(fixtures["Post"].len(), 5);
    }

    #[test]
    fn test_amount_override() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default()).define(
            |registry| {
                registry.define("User", FixtureDefinition::new().amount(2));
                registry.define("Post", FixtureDefinition::new().amount(0));
            },
        );
        let fixtures = engine.get_fixtures().unwrap();

        assert_eq!(fixtures["User"].len(), 2);
        assert!(fixtures["Post"].is_empty());
        // Nothing to select from, so the list relation is empty.
        assert_eq!(fixtures["User"][0]["posts"], FixtureValue::List(vec![]));
    }

    #[test]
    fn test_sequential_ids_span_models() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default());
        let graph = engine.build().unwrap();

        let ids: Vec<_> = graph
            .entities()
            .map(|e| e.scalars["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_all_bindings_resolved() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default());
        let graph = engine.build().unwrap();

        assert!(graph
            .entities()
            .flat_map(|e| e.relations.iter())
            .all(RelationBinding::is_resolved));
    }

    #[test]
    fn test_pool_matches_entities() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default());
        let graph = engine.build().unwrap();

        for model in ["User", "Post"] {
            let from_entities: Vec<_> = graph.entities_of(model).map(|e| e.id).collect();
            assert_eq!(graph.pool().get(model).unwrap(), from_entities.as_slice());
        }
    }

    #[test]
    fn test_internal_ids_not_reused_across_builds() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default());
        let first = engine.build().unwrap();
        let second = engine.build().unwrap();

        let last_first = first.entities().map(|e| e.id).max().unwrap();
        let min_second = second.entities().map(|e| e.id).min().unwrap();
        assert!(min_second > last_first);
    }

    #[test]
    fn test_factory_values_are_kept() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default()).define(
            |registry| {
                registry.define(
                    "User",
                    FixtureDefinition::new().factory(|random: &mut RandomValueProvider| {
                        Overrides::new()
                            .set("name", format!("{}!", random.first_name()))
                            .set("posts", FixtureDefinitionRegistry::at_max(2))
                    }),
                );
            },
        );
        let fixtures = engine.get_fixtures().unwrap();

        for user in &fixtures["User"] {
            assert!(user["name"].as_str().unwrap().ends_with('!'));
            assert_eq!(user["posts"].as_list().unwrap().len(), 2);
        }
    }

    #[test]
    fn test_unique_int_is_unsupported() {
        let schema = Schema::new(vec![ModelDescriptor::new(
            "Counter",
            vec![FieldDescriptor::scalar("value", ScalarType::Int).unique()],
        )]);
        let mut engine = FixtureEngine::new(schema, EngineOptions::default());

        let err = engine.build().unwrap_err();
        assert!(matches!(
            err,
            FixtureError::UnsupportedFieldType { ref model, ref field, .. }
                if model == "Counter" && field == "value"
        ));
    }

    #[test]
    fn test_unique_relation_is_unsupported() {
        let schema = Schema::new(vec![ModelDescriptor::new(
            "Profile",
            vec![
                FieldDescriptor::id("id"),
                FieldDescriptor::relation("owner", "Profile").unique(),
            ],
        )]);
        let mut engine = FixtureEngine::new(schema, EngineOptions::default());

        assert!(matches!(
            engine.build(),
            Err(FixtureError::UnsupportedFieldType { .. })
        ));
    }

    #[test]
    fn test_unique_string_uses_tokens() {
        let schema = Schema::new(vec![ModelDescriptor::new(
            "Account",
            vec![FieldDescriptor::scalar("email", ScalarType::String).unique()],
        )]);
        let mut engine = FixtureEngine::new(schema, EngineOptions::default());
        let fixtures = engine.get_fixtures().unwrap();

        let emails: HashSet<_> = fixtures["Account"]
            .iter()
            .map(|r| r["email"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(emails.len(), 5);
        assert!(emails.iter().all(|e| e.len() == 36));
    }

    #[test]
    fn test_duplicate_unique_value_from_factory() {
        let schema = Schema::new(vec![ModelDescriptor::new(
            "Account",
            vec![FieldDescriptor::id("id")],
        )]);
        let mut engine = FixtureEngine::new(schema, EngineOptions::default()).define(|registry| {
            registry.define(
                "Account",
                FixtureDefinition::fixed(Some(2), Overrides::new().set("id", 7i64)),
            );
        });

        let err = engine.build().unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateUniqueValue { .. }));
        assert_eq!(err.to_string(), "Duplicate value 7 for unique field Account.id");
    }

    #[test]
    fn test_duplicate_unique_value_from_id_generator() {
        let schema = Schema::new(vec![ModelDescriptor::new(
            "Account",
            vec![FieldDescriptor::id("id")],
        )]);
        let options =
            EngineOptions::default().with_id_generator(|| FixtureValue::from("same"));
        let mut engine = FixtureEngine::new(schema, options);

        assert!(matches!(
            engine.build(),
            Err(FixtureError::DuplicateUniqueValue { .. })
        ));
    }

    #[test]
    fn test_override_kind_mismatch() {
        let mut engine = FixtureEngine::new(blog_schema(), EngineOptions::default()).define(
            |registry| {
                registry.define(
                    "Post",
                    FixtureDefinition::fixed(None, Overrides::new().set("author", "bob")),
                );
            },
        );

        assert!(matches!(
            engine.build(),
            Err(FixtureError::OverrideKindMismatch { ref field, .. }) if field == "author"
        ));
    }

    #[test]
    fn test_unknown_relation_target() {
        let schema = Schema::new(vec![ModelDescriptor::new(
            "Post",
            vec![
                FieldDescriptor::id("id"),
                FieldDescriptor::relation("comments", "Comment").list(),
            ],
        )]);
        let mut engine = FixtureEngine::new(schema, EngineOptions::default());

        assert!(matches!(
            engine.build(),
            Err(FixtureError::UnknownRelationTarget(ref target)) if target == "Comment"
        ));
    }

    #[test]
    fn test_custom_id_generator() {
        let mut next = 100;
        let options = EngineOptions::default().with_id_generator(move || {
            next += 1;
            FixtureValue::String(format!("user-{next}"))
        });
        let schema = Schema::new(vec![ModelDescriptor::new(
            "User",
            vec![FieldDescriptor::id("id")],
        )]);
        let mut engine = FixtureEngine::new(schema, options);
        let fixtures = engine.get_fixtures().unwrap();

        assert_eq!(fixtures["User"][0]["id"], FixtureValue::from("user-101"));
        assert_eq!(fixtures["User"][4]["id"], FixtureValue::from("user-105"));
    }
}
