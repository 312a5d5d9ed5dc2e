//! Text value generators backed by `fake`.

use fake::faker::lorem::en::Word;
use fake::faker::name::en::FirstName;
use fake::Fake;
use rand::Rng;

/// Generate a single lorem word.
pub fn generate_word<R: Rng>(rng: &mut R) -> String {
    Word().fake_with_rng(rng)
}

/// Generate a first name.
pub fn generate_first_name<R: Rng>(rng: &mut R) -> String {
    FirstName().fake_with_rng(rng)
}
