//! Relation pools and constraint resolution.

use crate::error::{FixtureError, FixtureResult};
use crate::id::InternalId;
use crate::random::RandomValueProvider;
use fixture_core::Constraint;
use std::collections::HashMap;

/// Model name to the ids generated for that model, in creation order.
#[derive(Debug, Clone, Default)]
pub struct RelationPool {
    pools: HashMap<String, Vec<InternalId>>,
}

impl RelationPool {
    /// Create a pool with an empty entry for each model.
    pub fn for_models<'a>(models: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            pools: models
                .into_iter()
                .map(|model| (model.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Append a freshly generated id to its model's entry.
    pub fn push(&mut self, model: &str, id: InternalId) {
        self.pools.entry(model.to_string()).or_default().push(id);
    }

    /// Ids generated for a model, or `None` if the model is unknown.
    pub fn get(&self, model: &str) -> Option<&[InternalId]> {
        self.pools.get(model).map(Vec::as_slice)
    }

    /// Names of every model with an entry.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }
}

/// Selects related ids from a fully populated [`RelationPool`].
#[derive(Debug, Clone, Copy)]
pub struct ConstraintResolver<'a> {
    pool: &'a RelationPool,
}

impl<'a> ConstraintResolver<'a> {
    /// Create a resolver over `pool`. The pool must already hold every
    /// instance of every model.
    pub fn new(pool: &'a RelationPool) -> Self {
        Self { pool }
    }

    /// Select ids of `target` according to `constraint`.
    ///
    /// The selection is a shuffled prefix of the candidates, so it is
    /// duplicate-free and reproducible under the provider's seed.
    pub fn resolve(
        &self,
        target: &str,
        constraint: Constraint,
        random: &mut RandomValueProvider,
    ) -> FixtureResult<Vec<InternalId>> {
        let candidates = self
            .pool
            .get(target)
            .ok_or_else(|| FixtureError::UnknownRelationTarget(target.to_string()))?;

        let size = constraint.selection_size(candidates.len());
        Ok(random.sample(candidates, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::InternalIdAllocator;
    use std::collections::HashSet;

    fn pool_with(model: &str, count: usize) -> (RelationPool, Vec<InternalId>) {
        let mut allocator = InternalIdAllocator::new();
        let mut pool = RelationPool::for_models([model]);
        let ids: Vec<_> = (0..count).map(|_| allocator.allocate()).collect();
        for id in &ids {
            pool.push(model, *id);
        }
        (pool, ids)
    }

    #[test]
    fn test_at_max_selects_distinct_ids_from_pool() {
        let (pool, ids) = pool_with("User", 10);
        let resolver = ConstraintResolver::new(&pool);
        let mut random = RandomValueProvider::default();

        for k in [0, 1, 3, 10, 15] {
            let selected = resolver
                .resolve("User", Constraint::at_max(k), &mut random)
                .unwrap();
            assert_eq!(selected.len(), k.min(10));

            let unique: HashSet<_> = selected.iter().collect();
            assert_eq!(unique.len(), selected.len());
            assert!(selected.iter().all(|id| ids.contains(id)));
        }
    }

    #[test]
    fn test_at_least_if_existing_returns_whole_pool() {
        let (pool, ids) = pool_with("Post", 4);
        let resolver = ConstraintResolver::new(&pool);
        let mut random = RandomValueProvider::default();
        let expected: HashSet<_> = ids.iter().copied().collect();

        for k in [0, 1, 4, 5, 50] {
            let selected = resolver
                .resolve("Post", Constraint::at_least_if_existing(k), &mut random)
                .unwrap();
            assert_eq!(selected.len(), 4, "k = {k}");
            assert_eq!(selected.into_iter().collect::<HashSet<_>>(), expected);
        }
    }

    #[test]
    fn test_default_constraint_takes_five() {
        let (pool, _) = pool_with("Tag", 8);
        let resolver = ConstraintResolver::new(&pool);
        let mut random = RandomValueProvider::default();

        let selected = resolver
            .resolve("Tag", Constraint::default(), &mut random)
            .unwrap();
        assert_eq!(selected.len(), 5);
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let pool = RelationPool::for_models(["Empty"]);
        let resolver = ConstraintResolver::new(&pool);
        let mut random = RandomValueProvider::default();

        let selected = resolver
            .resolve("Empty", Constraint::at_max(3), &mut random)
            .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_unknown_target() {
        let pool = RelationPool::for_models(["User"]);
        let resolver = ConstraintResolver::new(&pool);
        let mut random = RandomValueProvider::default();

        let result = resolver.resolve("Comment", Constraint::at_max(1), &mut random);
        assert!(matches!(
            result,
            Err(FixtureError::UnknownRelationTarget(ref target)) if target == "Comment"
        ));
    }

    #[test]
    fn test_resolution_is_reproducible() {
        let (pool, _) = pool_with("User", 10);
        let resolver = ConstraintResolver::new(&pool);
        let mut a = RandomValueProvider::new(42);
        let mut b = RandomValueProvider::new(42);

        assert_eq!(
            resolver.resolve("User", Constraint::at_max(4), &mut a).unwrap(),
            resolver.resolve("User", Constraint::at_max(4), &mut b).unwrap()
        );
    }
}
