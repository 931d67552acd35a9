//! Benchmark payload generation.
//!
//! Produces the values the producer pushes. They are generated once per run
//! from an explicit seed, so every variant moves the same data and a run
//! can be reproduced from its logged seed.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates `items` pseudo-random values from `seed`.
///
/// The result is shared read-only between the producer, which pushes it in
/// order, and the consumer, which checks what it pops against it.
pub fn generate(items: usize, seed: u64) -> Arc<[u32]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..items).map(|_| rng.r#gen::<u32>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_payload() {
        assert_eq!(generate(1_000, 42), generate(1_000, 42));
    }

    #[test]
    fn different_seeds_diverge() {
        assert_ne!(generate(1_000, 1), generate(1_000, 2));
    }

    #[test]
    fn length_matches_request() {
        assert_eq!(generate(0, 9).len(), 0);
        assert_eq!(generate(513, 9).len(), 513);
    }
}
