//! Seeded random value provider.
//!
//! Every random decision the engine makes (scalar values, opaque unique
//! tokens, relation selection) draws from the one `StdRng` owned here. Two
//! providers created with the same seed yield identical sequences for the
//! same call order.

use crate::generators::{self, text, timestamp};
use chrono::{DateTime, Utc};
use fixture_core::{FixtureValue, ScalarType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic source of scalar values.
pub struct RandomValueProvider {
    /// Seed the RNG was created from
    seed: u64,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Reference instant for `date_time` fields
    date_anchor: DateTime<Utc>,
}

impl RandomValueProvider {
    /// Create a provider seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            date_anchor: timestamp::default_anchor(),
        }
    }

    /// Set the reference instant that `date_time` values precede.
    pub fn with_date_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.date_anchor = anchor;
        self
    }

    /// Seed this provider was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a non-unique value for a scalar type.
    pub fn scalar(&mut self, scalar: ScalarType) -> FixtureValue {
        generators::generate_scalar(scalar, &mut self.rng, self.date_anchor)
    }

    /// A random lorem word.
    pub fn word(&mut self) -> String {
        text::generate_word(&mut self.rng)
    }

    /// A random first name.
    pub fn first_name(&mut self) -> String {
        text::generate_first_name(&mut self.rng)
    }

    /// A random integer in `min..=max`.
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    /// A random float in `min..=max`.
    pub fn float_range(&mut self, min: f64, max: f64) -> f64 {
        self.rng.gen_range(min..=max)
    }

    /// A timestamp within the day before the date anchor.
    pub fn recent_date(&mut self) -> DateTime<Utc> {
        timestamp::generate_recent(&mut self.rng, self.date_anchor)
    }

    /// An opaque random token (hyphenated UUID v4) drawn from the seeded RNG.
    pub fn token(&mut self) -> String {
        generators::uuid::generate_uuid_v4(&mut self.rng).to_string()
    }

    /// Shuffle-and-slice: a Fisher–Yates shuffle of a copy of `items`,
    /// then its first `n` elements (all of them if `n` exceeds the length).
    pub fn sample<T: Clone>(&mut self, items: &[T], n: usize) -> Vec<T> {
        let mut shuffled = items.to_vec();
        shuffled.shuffle(&mut self.rng);
        shuffled.truncate(n);
        shuffled
    }
}

impl std::fmt::Debug for RandomValueProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomValueProvider")
            .field("seed", &self.seed)
            .field("date_anchor", &self.date_anchor)
            .finish_non_exhaustive()
    }
}

impl Default for RandomValueProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
