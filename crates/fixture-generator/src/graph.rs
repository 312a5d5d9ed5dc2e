//! In-memory fixture graph.
//!
//! ```text
//! FixtureGraph
//!   ├── entities: InternalId → EntityRecord { model, scalars, relations }
//!   └── pool:     model name → [InternalId]
//! ```
//!
//! Relation fields start out as [`BindingState::Pending`] and are turned
//! into [`BindingState::Resolved`] exactly once by the engine's resolve pass.

use crate::error::FixtureResult;
use crate::id::InternalId;
use crate::resolver::RelationPool;
use fixture_core::{Constraint, FixtureRecord, FixtureValue, Schema};
use std::collections::BTreeMap;
use std::sync::Arc;

/// State of one relation field.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingState {
    /// Not yet evaluated; the constraint to apply once all pools are full.
    Pending(Constraint),
    /// Selected related ids, in selection order.
    Resolved(Vec<InternalId>),
}

/// Deferred binding of one relation field.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationBinding {
    /// Relation field name
    pub field: String,
    /// Target model name
    pub target: String,
    /// Whether the field holds a list
    pub list: bool,
    state: BindingState,
}

impl RelationBinding {
    /// Create a pending binding.
    pub fn pending(
        field: impl Into<String>,
        target: impl Into<String>,
        list: bool,
        constraint: Constraint,
    ) -> Self {
        Self {
            field: field.into(),
            target: target.into(),
            list,
            state: BindingState::Pending(constraint),
        }
    }

    /// Current state.
    pub fn state(&self) -> &BindingState {
        &self.state
    }

    /// Whether the binding has been resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, BindingState::Resolved(_))
    }

    /// Resolved ids, or `None` while pending.
    pub fn ids(&self) -> Option<&[InternalId]> {
        match &self.state {
            BindingState::Resolved(ids) => Some(ids),
            BindingState::Pending(_) => None,
        }
    }

    /// Resolve the binding with `select`, memoizing the result. A resolved
    /// binding returns its ids without calling `select` again.
    pub fn resolve_with<F>(&mut self, select: F) -> FixtureResult<&[InternalId]>
    where
        F: FnOnce(&str, Constraint) -> FixtureResult<Vec<InternalId>>,
    {
        if let BindingState::Pending(constraint) = self.state {
            let ids = select(&self.target, constraint)?;
            self.state = BindingState::Resolved(ids);
        }
        Ok(self.ids().unwrap_or_default())
    }
}

/// One generated instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Graph key
    pub id: InternalId,
    /// Owning model
    pub model: String,
    /// Scalar field values
    pub scalars: FixtureRecord,
    /// Relation fields in declaration order
    pub relations: Vec<RelationBinding>,
}

/// Generated entities plus the relation pool they were registered in.
#[derive(Debug, Clone)]
pub struct FixtureGraph {
    pub(crate) schema: Arc<Schema>,
    pub(crate) entities: BTreeMap<InternalId, EntityRecord>,
    pub(crate) pool: RelationPool,
}

impl FixtureGraph {
    /// Create an empty graph with a pool entry per schema model.
    pub fn new(schema: Arc<Schema>) -> Self {
        let pool = RelationPool::for_models(schema.model_names());
        Self {
            schema,
            entities: BTreeMap::new(),
            pool,
        }
    }

    /// Insert an entity and register its id in its model's pool.
    pub(crate) fn insert(&mut self, entity: EntityRecord) {
        self.pool.push(&entity.model, entity.id);
        self.entities.insert(entity.id, entity);
    }

    /// Schema the graph was built from.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Relation pool.
    pub fn pool(&self) -> &RelationPool {
        &self.pool
    }

    /// Look up an entity.
    pub fn get(&self, id: InternalId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    /// Entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityRecord> {
        self.entities.values()
    }

    /// Entities of one model in creation order.
    pub fn entities_of<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a EntityRecord> {
        self.entities.values().filter(move |e| e.model == model)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the graph holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Plain records per model, in creation order.
    ///
    /// Relation fields are replaced by the related instances' scalar
    /// records: a single record (or `Null` when nothing was selected) for a
    /// non-list field, a list of records for a list field. Nesting stops at
    /// one level: the related records carry only their scalar fields, never
    /// their own relations. Internal ids do not appear in the output.
    pub fn fixtures(&self) -> BTreeMap<String, Vec<FixtureRecord>> {
        let mut output: BTreeMap<String, Vec<FixtureRecord>> = self
            .pool
            .model_names()
            .map(|model| (model.to_string(), Vec::new()))
            .collect();

        for entity in self.entities.values() {
            let record = self.resolved_record(entity);
            output.entry(entity.model.clone()).or_default().push(record);
        }

        output
    }

    fn resolved_record(&self, entity: &EntityRecord) -> FixtureRecord {
        let mut record = entity.scalars.clone();

        for binding in &entity.relations {
            let related: Vec<FixtureValue> = binding
                .ids()
                .unwrap_or_default()
                .iter()
                .filter_map(|id| self.entities.get(id))
                .map(|related| FixtureValue::Record(related.scalars.clone()))
                .collect();

            let value = if binding.list {
                FixtureValue::List(related)
            } else {
                related.into_iter().next().unwrap_or(FixtureValue::Null)
            };
            record.insert(binding.field.clone(), value);
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FixtureError;
    use crate::id::InternalIdAllocator;
    use fixture_core::{FieldDescriptor, ModelDescriptor};

    #[test]
    fn test_binding_resolves_once() {
        let mut allocator = InternalIdAllocator::new();
        let target = allocator.allocate();
        let mut binding = RelationBinding::pending("author", "User", false, Constraint::at_max(1));
        assert!(!binding.is_resolved());

        let mut calls = 0;
        let ids = binding
            .resolve_with(|model, constraint| {
                calls += 1;
                assert_eq!(model, "User");
                assert_eq!(constraint, Constraint::AtMax(1));
                Ok(vec![target])
            })
            .unwrap()
            .to_vec();
        assert_eq!(ids, vec![target]);

        let again = binding
            .resolve_with(|_, _| {
                calls += 1;
                Ok(vec![])
            })
            .unwrap()
            .to_vec();
        assert_eq!(again, vec![target]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_binding_error_keeps_pending() {
        let mut binding = RelationBinding::pending("tags", "Tag", true, Constraint::default());
        let result =
            binding.resolve_with(|t, _| Err(FixtureError::UnknownRelationTarget(t.to_string())));

        assert!(result.is_err());
        assert_eq!(binding.state(), &BindingState::Pending(Constraint::AtMax(5)));
    }

    #[test]
    fn test_fixtures_expand_relations() {
        let schema = Arc::new(Schema::new(vec![
            ModelDescriptor::new(
                "User",
                vec![
                    FieldDescriptor::id("id"),
                    FieldDescriptor::relation("posts", "Post").list(),
                ],
            ),
            ModelDescriptor::new(
                "Post",
                vec![
                    FieldDescriptor::id("id"),
                    FieldDescriptor::relation("author", "User"),
                ],
            ),
            ModelDescriptor::new("Tag", vec![FieldDescriptor::id("id")]),
        ]));
        let mut allocator = InternalIdAllocator::new();
        let user_id = allocator.allocate();
        let post_id = allocator.allocate();

        let mut graph = FixtureGraph::new(schema);
        graph.insert(EntityRecord {
            id: user_id,
            model: "User".to_string(),
            scalars: [("id".to_string(), FixtureValue::Int(1))].into_iter().collect(),
            relations: vec![RelationBinding {
                field: "posts".to_string(),
                target: "Post".to_string(),
                list: true,
                state: BindingState::Resolved(vec![post_id]),
            }],
        });
        graph.insert(EntityRecord {
            id: post_id,
            model: "Post".to_string(),
            scalars: [("id".to_string(), FixtureValue::Int(2))].into_iter().collect(),
            relations: vec![RelationBinding {
                field: "author".to_string(),
                target: "User".to_string(),
                list: false,
                state: BindingState::Resolved(vec![]),
            }],
        });

        let fixtures = graph.fixtures();
        assert_eq!(fixtures["Tag"].len(), 0);

        let user = &fixtures["User"][0];
        let posts = user["posts"].as_list().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].as_record().unwrap()["id"], FixtureValue::Int(2));

        let post = &fixtures["Post"][0];
        assert!(post["author"].is_null());
        assert_eq!(graph.pool().get("User").unwrap(), &[user_id]);
    }
}
