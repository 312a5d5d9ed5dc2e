//! Identifier generators.
//!
//! Two independent counters exist per engine: the pluggable
//! [`IdGenerator`] fills unique `id` fields that end up in fixture data,
//! while [`InternalIdAllocator`] keys entities inside the fixture graph and
//! never leaves it.

use fixture_core::FixtureValue;
use std::fmt;

/// Source of values for unique `id` fields.
pub trait IdGenerator: Send {
    /// Produce the next identifier. Must not repeat within one engine.
    fn generate(&mut self) -> FixtureValue;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> FixtureValue + Send,
{
    fn generate(&mut self) -> FixtureValue {
        self()
    }
}

/// Counter-based identifier generator starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: i64,
}

impl SequentialIdGenerator {
    /// Create a generator whose first identifier is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first identifier is `start`.
    pub fn starting_at(start: i64) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&mut self) -> FixtureValue {
        let id = self.next;
        self.next += 1;
        FixtureValue::Int(id)
    }
}

/// Key of an entity in the fixture graph.
///
/// Unique across every model of one engine and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternalId(u64);

impl InternalId {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for [`InternalId`]s, owned by one engine.
#[derive(Debug)]
pub struct InternalIdAllocator {
    next: u64,
}

impl InternalIdAllocator {
    /// Create an allocator whose first id is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> InternalId {
        let id = InternalId(self.next);
        self.next += 1;
        id
    }
}

impl Default for InternalIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_start_at_one() {
        let mut ids = SequentialIdGenerator::new();
        assert_eq!(ids.generate(), FixtureValue::Int(1));
        assert_eq!(ids.generate(), FixtureValue::Int(2));
        assert_eq!(ids.generate(), FixtureValue::Int(3));
    }

    #[test]
    fn test_sequential_ids_custom_start() {
        let mut ids = SequentialIdGenerator::starting_at(100);
        assert_eq!(ids.generate(), FixtureValue::Int(100));
    }

    #[test]
    fn test_closure_generator() {
        let mut n = 0;
        let mut ids = move || {
            n += 10;
            FixtureValue::String(format!("id-{n}"))
        };
        assert_eq!(IdGenerator::generate(&mut ids), FixtureValue::from("id-10"));
        assert_eq!(IdGenerator::generate(&mut ids), FixtureValue::from("id-20"));
    }

    #[test]
    fn test_internal_ids_are_monotonic() {
        let mut allocator = InternalIdAllocator::new();
        let a = allocator.allocate();
        let b = allocator.allocate();

        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert!(a < b);
        assert_eq!(b.to_string(), "#2");
    }
}
