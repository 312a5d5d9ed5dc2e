//! Numeric value generators.

use fixture_core::FixtureValue;
use rand::Rng;

/// Bounds used for non-unique `int`, `float` and `id` fields.
pub const DEFAULT_MIN: i64 = 1;
pub const DEFAULT_MAX: i64 = 100;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> FixtureValue {
    FixtureValue::Int(rng.gen_range(min..=max))
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> FixtureValue {
    FixtureValue::Float(rng.gen_range(min..=max))
}

/// Generate a boolean with even odds.
pub fn generate_bool<R: Rng>(rng: &mut R) -> FixtureValue {
    FixtureValue::Bool(rng.gen_bool(0.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_int_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_int_range(&mut rng, DEFAULT_MIN, DEFAULT_MAX);
            if let FixtureValue::Int(v) = value {
                assert!((1..=100).contains(&v));
            } else {
                panic!("Expected Int value");
            }
        }
    }

    #[test]
    fn test_generate_float_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_float_range(&mut rng, 1.0, 100.0);
            if let FixtureValue::Float(v) = value {
                assert!((1.0..=100.0).contains(&v));
            } else {
                panic!("Expected Float value");
            }
        }
    }

    #[test]
    fn test_generate_bool_produces_both_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<_> = (0..64).map(|_| generate_bool(&mut rng)).collect();

        assert!(values.contains(&FixtureValue::Bool(true)));
        assert!(values.contains(&FixtureValue::Bool(false)));
    }
}
