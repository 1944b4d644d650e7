//! `DeterministicRng` - Seeded Randomness for Simulation Runs
//!
//! `TigerStyle`: every random choice in a simulation (which table, which
//! operation, which row id, whether a fault fires) flows through one seeded
//! ChaCha20 stream so a failing run can be replayed from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Multiplier used to derive fork seeds (64-bit golden ratio).
const FORK_SEED_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// A deterministic random number generator.
///
/// Same seed, same sequence. `fork` hands out independent streams so that,
/// for example, the fault injector's rolls don't shift the workload's rolls.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    rng: ChaCha20Rng,
    seed: u64,
    forks_count: u64,
}

impl DeterministicRng {
    /// Create a new RNG with the given seed.
    ///
    /// # Example
    /// ```
    /// use rowstore_core::dst::DeterministicRng;
    /// let mut rng = DeterministicRng::new(42);
    /// let roll = rng.next_float();
    /// assert!((0.0..1.0).contains(&roll));
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
            forks_count: 0,
        }
    }

    /// Get the original seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random float in [0, 1).
    pub fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Generate a random integer in [min, max] (inclusive).
    ///
    /// # Panics
    /// Panics if min > max.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "min ({min}) must be <= max ({max})");
        self.rng.gen_range(min..=max)
    }

    /// Generate an index in [0, len).
    ///
    /// # Panics
    /// Panics if len is zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick an index from an empty range");
        self.rng.gen_range(0..len)
    }

    /// Generate a random boolean with the given probability of true.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    pub fn next_bool(&mut self, probability: f64) -> bool {
        assert!(
            (0.0..=1.0).contains(&probability),
            "probability must be in [0, 1], got {probability}"
        );
        self.next_float() < probability
    }

    /// Choose a random element from a slice.
    ///
    /// # Panics
    /// Panics if the slice is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "cannot choose from empty slice");
        &items[self.next_index(items.len())]
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }

    /// Create an independent stream derived from this one.
    pub fn fork(&mut self) -> Self {
        self.forks_count += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.forks_count.wrapping_mul(FORK_SEED_MULTIPLIER));
        Self::new(fork_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_int(0, i64::MAX), rng2.next_int(0, i64::MAX));
        }
    }

    #[test]
    fn test_different_seeds_different_sequence() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        let differs = (0..10).any(|_| rng1.next_float() != rng2.next_float());
        assert!(differs, "different seeds should produce different sequences");
    }

    #[test]
    fn test_next_int_bounds() {
        let mut rng = DeterministicRng::new(42);
        for _ in 0..100 {
            assert!((5..=10).contains(&rng.next_int(5, 10)));
        }
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = DeterministicRng::new(42);
        for _ in 0..100 {
            assert!(rng.next_index(3) < 3);
        }
    }

    #[test]
    fn test_next_bool_extremes() {
        let mut rng = DeterministicRng::new(42);
        for _ in 0..100 {
            assert!(!rng.next_bool(0.0));
            assert!(rng.next_bool(1.0));
        }
    }

    #[test]
    fn test_fork_independence() {
        let mut rng = DeterministicRng::new(42);
        let mut fork1 = rng.fork();
        let mut fork2 = rng.fork();

        assert_ne!(fork1.seed(), fork2.seed());

        let a: Vec<f64> = (0..5).map(|_| fork1.next_float()).collect();
        let b: Vec<f64> = (0..5).map(|_| fork2.next_float()).collect();
        assert_ne!(a, b, "forks should have different sequences");
    }

    #[test]
    fn test_fork_is_reproducible() {
        let mut parent1 = DeterministicRng::new(7);
        let mut parent2 = DeterministicRng::new(7);
        assert_eq!(parent1.fork().seed(), parent2.fork().seed());
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = DeterministicRng::new(42);
        let mut items: Vec<u32> = (1..=10).collect();
        rng.shuffle(&mut items);

        assert_ne!(items, (1..=10).collect::<Vec<_>>(), "shuffle should change order");
        items.sort_unstable();
        assert_eq!(items, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_choose() {
        let mut rng = DeterministicRng::new(42);
        let tables = ["posts", "pages", "settings"];
        for _ in 0..50 {
            assert!(tables.contains(rng.choose(&tables)));
        }
    }

    #[test]
    #[should_panic(expected = "min (10) must be <= max (5)")]
    fn test_next_int_invalid_range() {
        let mut rng = DeterministicRng::new(42);
        rng.next_int(10, 5);
    }

    #[test]
    #[should_panic(expected = "probability must be in [0, 1]")]
    fn test_next_bool_invalid_probability() {
        let mut rng = DeterministicRng::new(42);
        rng.next_bool(1.5);
    }

    #[test]
    #[should_panic(expected = "cannot choose from empty slice")]
    fn test_choose_empty() {
        let mut rng = DeterministicRng::new(42);
        let items: Vec<i32> = vec![];
        rng.choose(&items);
    }
}
