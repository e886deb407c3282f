//! RNG module - seeded piece selection
//!
//! Each engine owns its own generator; there is no process-wide randomness.
//! The stream is seeded from a combined hash of the caller's seed and the
//! learning mode, so the same seed gives a different (but reproducible)
//! piece sequence per mode.

use crate::types::{LearningMode, PieceKind};

/// Salt separating the mode hash from the seed hash
const MODE_SALT: u64 = 0x6d6f_6465_5f74_6167;

/// SplitMix64 finalizer: stable 64-bit avalanche hash
pub fn mix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Combine a game seed and a learning mode into one RNG seed
///
/// XOR of two independent hashes, so neither input can cancel the other.
pub fn combined_seed(seed: u64, mode: LearningMode) -> u64 {
    mix64(seed) ^ mix64(MODE_SALT ^ mode.tag())
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses Knuth's MMIX constants; output is the high half of the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Create the generator for a (seed, mode) pair
    pub fn for_game(seed: u64, mode: LearningMode) -> Self {
        Self::new(combined_seed(seed, mode))
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Generate random value in range [lo, hi]
    pub fn next_range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next_range(hi - lo + 1)
    }

    /// Draw a piece kind uniformly from the seven shapes
    pub fn next_piece(&mut self) -> PieceKind {
        let tag = self.next_range_inclusive(1, 7) as u8;
        PieceKind::from_tag(tag).unwrap_or(PieceKind::O)
    }

    /// Current generator state (the RNG cursor)
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::for_game(0, LearningMode::Training)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_combined_seed_depends_on_mode() {
        for seed in [0u64, 1, 42, u64::MAX] {
            assert_ne!(
                combined_seed(seed, LearningMode::Training),
                combined_seed(seed, LearningMode::Validation)
            );
        }
    }

    #[test]
    fn test_combined_seed_is_stable() {
        // Pinned so piece sequences stay reproducible across releases.
        assert_eq!(mix64(0), 0xe220_a839_7b1d_cdaf);
        assert_eq!(
            combined_seed(7, LearningMode::Training),
            mix64(7) ^ mix64(MODE_SALT)
        );
    }

    #[test]
    fn test_next_range_inclusive_bounds() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..1000 {
            let v = rng.next_range_inclusive(1, 7);
            assert!((1..=7).contains(&v));
        }
    }

    #[test]
    fn test_piece_distribution_covers_all_kinds() {
        let mut rng = SimpleRng::for_game(3, LearningMode::Training);
        let mut counts = [0u32; 7];
        for _ in 0..7000 {
            counts[(rng.next_piece().tag() - 1) as usize] += 1;
        }
        for (i, &c) in counts.iter().enumerate() {
            assert!(c > 700, "kind {} drawn only {} times", i + 1, c);
        }
    }

    #[test]
    fn test_game_streams_reproduce() {
        let mut a = SimpleRng::for_game(5, LearningMode::Validation);
        let mut b = SimpleRng::for_game(5, LearningMode::Validation);
        let seq_a: Vec<_> = (0..50).map(|_| a.next_piece()).collect();
        let seq_b: Vec<_> = (0..50).map(|_| b.next_piece()).collect();
        assert_eq!(seq_a, seq_b);
    }
}
