//! Seedable randomness.
//!
//! Every randomized operation in the crate takes an explicit `Rng`, so a
//! fixed seed always reproduces the same sequence of picks.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source used by runners that own their RNG.
pub type SeatRng = ChaCha8Rng;

/// Creates a deterministic RNG from `seed`.
pub fn create_rng(seed: u64) -> SeatRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Deterministic RNG when a seed is given, entropy-seeded otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> SeatRng {
    create_rng(seed.unwrap_or_else(rand::random))
}

/// Picks an index with probability proportional to `weights[i]`.
///
/// Returns `None` when `weights` is empty or sums to zero.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[u64], rng: &mut R) -> Option<usize> {
    let dist = WeightedIndex::new(weights).ok()?;
    Some(dist.sample(rng))
}
