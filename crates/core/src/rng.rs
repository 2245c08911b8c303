//! RNG module - color pool selection and random tile kinds
//!
//! A board plays with a subset of the six base colors. The subset is chosen
//! by shuffling all base kinds and keeping the first `color_count`; every
//! later draw (initial fill, gravity refill, color-bomb target) picks
//! uniformly from that pool.
//!
//! Also provides a simple LCG so identical seeds replay identical games.

use arrayvec::ArrayVec;

use crate::error::{ResolveError, Result};
use crate::types::{TileKind, BASE_KINDS, BASE_KIND_COUNT, MIN_COLOR_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits cycle with a short period; draw from the high half.
        (self.next_u32() >> 16) % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (reseeding with it continues the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// The colors one board draws from
#[derive(Debug, Clone)]
pub struct ColorPool {
    kinds: ArrayVec<TileKind, { BASE_KIND_COUNT as usize }>,
    rng: SimpleRng,
}

impl ColorPool {
    /// Pick `color_count` of the base colors at random.
    ///
    /// Fewer than three colors cannot always avoid pre-made runs, so the
    /// count must lie in `[MIN_COLOR_COUNT, BASE_KIND_COUNT]`.
    pub fn new(color_count: u8, seed: u32) -> Result<Self> {
        if !(MIN_COLOR_COUNT..=BASE_KIND_COUNT).contains(&color_count) {
            return Err(ResolveError::color_count(color_count));
        }

        let mut rng = SimpleRng::new(seed);
        let mut all = BASE_KINDS;
        rng.shuffle(&mut all);

        let kinds = all.iter().copied().take(color_count as usize).collect();
        Ok(Self { kinds, rng })
    }

    /// Build a pool with an explicit color set (fixtures)
    pub fn with_kinds(kinds: &[TileKind], seed: u32) -> Result<Self> {
        let mut pool: ArrayVec<TileKind, { BASE_KIND_COUNT as usize }> = ArrayVec::new();
        for &kind in kinds {
            if !kind.is_base() {
                return Err(ResolveError::Layout(format!(
                    "{} is not a base color",
                    kind.as_str()
                )));
            }
            if !pool.contains(&kind) {
                pool.push(kind);
            }
        }
        if pool.len() < MIN_COLOR_COUNT as usize {
            return Err(ResolveError::color_count(pool.len() as u8));
        }
        Ok(Self {
            kinds: pool,
            rng: SimpleRng::new(seed),
        })
    }

    /// Draw a uniformly random color from the pool
    pub fn draw(&mut self) -> TileKind {
        let idx = self.rng.next_range(self.kinds.len() as u32) as usize;
        self.kinds[idx]
    }

    pub fn kinds(&self) -> &[TileKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Get the current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
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
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(3) < 3);
        }
    }

    #[test]
    fn test_pool_rejects_bad_counts() {
        assert!(ColorPool::new(2, 1).is_err());
        assert!(ColorPool::new(7, 1).is_err());
        assert!(ColorPool::new(3, 1).is_ok());
        assert!(ColorPool::new(6, 1).is_ok());
    }

    #[test]
    fn test_pool_has_distinct_base_colors() {
        let pool = ColorPool::new(5, 99).unwrap();
        assert_eq!(pool.len(), 5);
        for (i, kind) in pool.kinds().iter().enumerate() {
            assert!(kind.is_base());
            assert!(!pool.kinds()[i + 1..].contains(kind));
        }
    }

    #[test]
    fn test_pool_draws_only_pool_colors() {
        let mut pool = ColorPool::new(3, 4242).unwrap();
        let mut seen = Vec::new();
        for _ in 0..300 {
            let kind = pool.draw();
            assert!(pool.contains(kind));
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        // 300 draws over 3 colors should hit every color
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_with_kinds_dedups_and_validates() {
        let pool = ColorPool::with_kinds(
            &[TileKind::A, TileKind::B, TileKind::A, TileKind::C],
            1,
        )
        .unwrap();
        assert_eq!(pool.kinds(), &[TileKind::A, TileKind::B, TileKind::C]);

        assert!(ColorPool::with_kinds(&[TileKind::A, TileKind::B], 1).is_err());
        assert!(ColorPool::with_kinds(&[TileKind::A, TileKind::B, TileKind::Bird], 1).is_err());
    }
}
