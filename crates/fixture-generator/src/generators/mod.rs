//! Individual value generators for the scalar field types.
//!
//! This module provides the generation rule for each declared scalar type.
//! All generators draw from the caller's RNG, so output is determined by
//! the engine seed.

pub mod numeric;
pub mod text;
pub mod timestamp;
pub mod uuid;

use chrono::{DateTime, Utc};
use fixture_core::{FixtureValue, ScalarType};
use rand::Rng;

/// Generate a non-unique value for a scalar type.
///
/// `anchor` is the reference instant for `date_time` fields.
pub fn generate_scalar<R: Rng>(
    scalar: ScalarType,
    rng: &mut R,
    anchor: DateTime<Utc>,
) -> FixtureValue {
    match scalar {
        ScalarType::String => FixtureValue::String(text::generate_word(rng)),

        ScalarType::Int | ScalarType::Id => {
            numeric::generate_int_range(rng, numeric::DEFAULT_MIN, numeric::DEFAULT_MAX)
        }

        ScalarType::Float => numeric::generate_float_range(
            rng,
            numeric::DEFAULT_MIN as f64,
            numeric::DEFAULT_MAX as f64,
        ),

        ScalarType::Boolean => numeric::generate_bool(rng),

        ScalarType::DateTime => FixtureValue::DateTime(timestamp::generate_recent(rng, anchor)),
    }
}
